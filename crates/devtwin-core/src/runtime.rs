//! Runtime facade pairing the device registry with the twin store
//!
//! Device creation goes through here so a device and its twin appear
//! together: the twin is initialized first and the device is only inserted
//! into the registry once that succeeded. Any device a reader can discover
//! therefore already has a twin.

use crate::command::{CommandAck, CommandTranslator};
use crate::device::{Device, DeviceId, DeviceRegistry, NewDevice};
use crate::error::TwinResult;
use crate::store::TwinStore;
use crate::twin::{Patch, TwinSnapshot};
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for the runtime
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Shard count for the twin map. Must be a power of two greater than
    /// one; anything else falls back to the dashmap default.
    pub shard_amount: Option<usize>,
}

/// Entry point for every device and twin operation.
///
/// The registry and store are not exposed: a twin only comes into existence
/// through `create_device`.
#[derive(Clone)]
pub struct Runtime {
    registry: Arc<DeviceRegistry>,
    store: Arc<TwinStore>,
    commands: CommandTranslator,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        let store = match config.shard_amount {
            Some(n) if n > 1 && n.is_power_of_two() => TwinStore::with_shard_amount(n),
            Some(n) => {
                warn!(shard_amount = n, "ignoring invalid shard amount");
                TwinStore::new()
            }
            None => TwinStore::new(),
        };
        let store = Arc::new(store);

        Self {
            registry: Arc::new(DeviceRegistry::new()),
            commands: CommandTranslator::new(Arc::clone(&store)),
            store,
        }
    }

    /// Register a device and initialize its twin as one step
    pub fn create_device(&self, input: NewDevice) -> TwinResult<(Device, TwinSnapshot)> {
        let (device, twin) = self
            .registry
            .create_with(input, |device| self.store.initialize(&device.id))?;

        info!(device_id = %device.id, name = %device.name, "device created");
        Ok((device, twin))
    }

    pub fn get_device(&self, id: &DeviceId) -> TwinResult<Device> {
        self.registry.get(id)
    }

    pub fn list_devices(&self) -> Vec<Device> {
        self.registry.list()
    }

    pub fn get_twin(&self, id: &DeviceId) -> TwinResult<TwinSnapshot> {
        self.store.get(id)
    }

    pub fn patch_twin(
        &self,
        id: &DeviceId,
        patch: Patch,
        expected_tag: Option<&str>,
    ) -> TwinResult<TwinSnapshot> {
        self.store.conditional_patch(id, patch, expected_tag)
    }

    pub fn set_heating_setpoint(&self, id: &DeviceId, value: f64) -> TwinResult<CommandAck> {
        self.commands.set_heating_setpoint(id, value)
    }

    pub fn set_operating_mode(
        &self,
        id: &DeviceId,
        mode: impl Into<String>,
    ) -> TwinResult<CommandAck> {
        self.commands.set_operating_mode(id, mode)
    }

    /// Number of registered devices, each backed by exactly one twin
    pub fn device_count(&self) -> usize {
        self.registry.len()
    }

    pub fn commands(&self) -> &CommandTranslator {
        &self.commands
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}
