//! Device identity records and the registry that owns them

use crate::error::{TwinError, TwinResult};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Opaque, immutable device identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Allocate a fresh unique ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Registered device. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Descriptive fields supplied at registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewDevice {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub location: String,
}

impl NewDevice {
    pub fn new(
        name: impl Into<String>,
        device_type: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            device_type: device_type.into(),
            location: location.into(),
        }
    }
}

/// Owns the set of registered devices
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: DashMap<DeviceId, Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device under a freshly allocated ID
    pub fn create(&self, input: NewDevice) -> Device {
        match self.create_with(input, |_| Ok::<_, Infallible>(())) {
            Ok((device, ())) => device,
            Err(never) => match never {},
        }
    }

    /// Register a device, running `before_visible` after the record is built
    /// but before any reader can observe it. If the hook fails the device is
    /// never inserted.
    pub fn create_with<T, E>(
        &self,
        input: NewDevice,
        before_visible: impl FnOnce(&Device) -> Result<T, E>,
    ) -> Result<(Device, T), E> {
        let device = Device {
            id: DeviceId::generate(),
            name: input.name,
            device_type: input.device_type,
            location: input.location,
            created_at: Utc::now(),
        };

        let attached = before_visible(&device)?;
        self.devices.insert(device.id.clone(), device.clone());

        debug!(device_id = %device.id, "device registered");
        Ok((device, attached))
    }

    pub fn get(&self, id: &DeviceId) -> TwinResult<Device> {
        self.devices
            .get(id)
            .map(|d| d.clone())
            .ok_or_else(|| TwinError::not_found(id))
    }

    /// All registered devices. Order is unspecified.
    pub fn list(&self) -> Vec<Device> {
        self.devices
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn contains(&self, id: &DeviceId) -> bool {
        self.devices.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let registry = DeviceRegistry::new();
        let device = registry.create(NewDevice::new("Boiler", "thermostat", "basement"));

        let fetched = registry.get(&device.id).unwrap();
        assert_eq!(fetched, device);
        assert_eq!(fetched.device_type, "thermostat");
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = DeviceRegistry::new();
        let a = registry.create(NewDevice::default());
        let b = registry.create(NewDevice::default());
        assert_ne!(a.id, b.id);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_device() {
        let registry = DeviceRegistry::new();
        let err = registry.get(&DeviceId::from("ghost")).unwrap_err();
        assert_eq!(err, TwinError::NotFound("ghost".to_string()));
    }

    #[test]
    fn test_hook_runs_before_insert() {
        let registry = DeviceRegistry::new();
        let (device, seen) = registry
            .create_with(NewDevice::default(), |d| {
                Ok::<_, TwinError>(registry.contains(&d.id))
            })
            .unwrap();
        assert!(!seen);
        assert!(registry.contains(&device.id));
    }

    #[test]
    fn test_failed_hook_leaves_no_device() {
        let registry = DeviceRegistry::new();
        let result = registry.create_with(NewDevice::default(), |_| {
            Err::<(), _>(TwinError::invalid("refused"))
        });
        assert!(result.is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_device_json_shape() {
        let registry = DeviceRegistry::new();
        let device = registry.create(NewDevice::new("Hall", "sensor", "hallway"));
        let json = serde_json::to_value(&device).unwrap();

        assert_eq!(json["type"], "sensor");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("device_type").is_none());
    }
}
