//! Twin store with per-device locking and conditional writes
//!
//! The map only guards membership. Each twin sits behind its own `RwLock`,
//! so a write to one device never blocks reads or writes on another, while
//! every mutation of the same device is serialized on that device's lock.

use crate::device::DeviceId;
use crate::error::{TwinError, TwinResult};
use crate::twin::{Patch, TwinSnapshot, TwinState};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

type TwinCell = Arc<RwLock<TwinState>>;

/// Exclusive owner of every twin record
#[derive(Debug, Default)]
pub struct TwinStore {
    twins: DashMap<DeviceId, TwinCell>,
}

impl TwinStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store with an explicit shard count (must be a power of two
    /// greater than one)
    pub fn with_shard_amount(shard_amount: usize) -> Self {
        Self {
            twins: DashMap::with_shard_amount(shard_amount),
        }
    }

    /// Create the twin for `device_id` at version 1
    pub fn initialize(&self, device_id: &DeviceId) -> TwinResult<TwinSnapshot> {
        match self.twins.entry(device_id.clone()) {
            Entry::Occupied(_) => Err(TwinError::invalid(format!(
                "twin for {device_id} already initialized"
            ))),
            Entry::Vacant(slot) => {
                let twin = TwinState::new();
                let snapshot = TwinSnapshot::of(&twin);
                slot.insert(Arc::new(RwLock::new(twin)));
                debug!(device_id = %device_id, "twin initialized");
                Ok(snapshot)
            }
        }
    }

    /// Current twin and its tag
    pub fn get(&self, device_id: &DeviceId) -> TwinResult<TwinSnapshot> {
        let cell = self.cell(device_id)?;
        let twin = cell.read().unwrap_or_else(PoisonError::into_inner);
        debug!(device_id = %device_id, version = twin.version, "twin read");
        Ok(TwinSnapshot::of(&twin))
    }

    /// Apply `patch` to the desired state, optionally gated on the caller's
    /// last observed tag. An empty `expected_tag` counts as absent.
    pub fn conditional_patch(
        &self,
        device_id: &DeviceId,
        patch: Patch,
        expected_tag: Option<&str>,
    ) -> TwinResult<TwinSnapshot> {
        let cell = self.cell(device_id)?;
        let mut twin = cell.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(expected) = expected_tag.filter(|tag| !tag.is_empty()) {
            let current = twin.etag();
            if !current.matches(expected) {
                warn!(device_id = %device_id, expected, current = %current, "version conflict");
                return Err(TwinError::VersionConflict {
                    expected: expected.to_string(),
                    current,
                });
            }
        }

        let keys = patch.len();
        twin.apply_patch(patch);
        info!(device_id = %device_id, version = twin.version, keys, "desired state patched");

        Ok(TwinSnapshot::of(&twin))
    }

    pub fn contains(&self, device_id: &DeviceId) -> bool {
        self.twins.contains_key(device_id)
    }

    pub fn len(&self) -> usize {
        self.twins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.twins.is_empty()
    }

    // Clone the cell out so the shard lock is released before the record lock is taken.
    fn cell(&self, device_id: &DeviceId) -> TwinResult<TwinCell> {
        self.twins
            .get(device_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| TwinError::not_found(device_id))
    }
}
