//! Domain commands translated into desired-state patches
//!
//! Every command follows the same path: validate the argument, build a
//! patch with a single top-level key, hand it to the store unconditionally,
//! and report the resulting version.

use crate::device::DeviceId;
use crate::error::{TwinError, TwinResult};
use crate::store::TwinStore;
use crate::twin::Patch;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// High-level operations against a device's desired state
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Target temperature for the heating circuit
    HeatingSetpoint(f64),
    /// Named operating mode, e.g. `auto`
    OperatingMode(String),
}

impl Command {
    pub fn validate(&self) -> TwinResult<()> {
        match self {
            // Zero doubles as "missing" for legacy callers, so it is refused.
            Self::HeatingSetpoint(value) if !value.is_finite() || *value == 0.0 => {
                Err(TwinError::invalid(format!(
                    "heating setpoint must be a finite non-zero number, got {value}"
                )))
            }
            Self::OperatingMode(mode) if mode.trim().is_empty() => {
                Err(TwinError::invalid("operating mode must not be blank"))
            }
            _ => Ok(()),
        }
    }

    pub fn into_patch(self) -> Patch {
        let mut patch = Patch::new();
        match self {
            Self::HeatingSetpoint(value) => {
                patch.insert("heating".to_string(), json!({ "setpoint": value }));
            }
            Self::OperatingMode(mode) => {
                patch.insert("mode".to_string(), Value::String(mode));
            }
        }
        patch
    }
}

/// Reference to asynchronous command-status tracking.
///
/// No tracking subsystem exists; the only variant says so. The location is
/// a fixed placeholder and must not be treated as resolvable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusRef {
    NotImplemented,
}

impl StatusRef {
    pub const PLACEHOLDER_LOCATION: &'static str = "/api/v1/commands/placeholder/status";

    pub fn location(&self) -> &'static str {
        match self {
            Self::NotImplemented => Self::PLACEHOLDER_LOCATION,
        }
    }
}

/// Acknowledgment of an accepted command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandAck {
    pub status: &'static str,
    pub device_id: DeviceId,
    pub desired_patch: Patch,
    pub twin_version: u64,
    pub status_ref: StatusRef,
}

/// Stateless adapter from commands to conditional patches
#[derive(Clone)]
pub struct CommandTranslator {
    store: Arc<TwinStore>,
}

impl CommandTranslator {
    pub fn new(store: Arc<TwinStore>) -> Self {
        Self { store }
    }

    pub fn execute(&self, device_id: &DeviceId, command: Command) -> TwinResult<CommandAck> {
        command.validate()?;
        let patch = command.into_patch();

        let updated = self
            .store
            .conditional_patch(device_id, patch.clone(), None)?;
        info!(device_id = %device_id, version = updated.version(), "command accepted");

        Ok(CommandAck {
            status: "accepted",
            device_id: device_id.clone(),
            desired_patch: patch,
            twin_version: updated.version(),
            status_ref: StatusRef::NotImplemented,
        })
    }

    pub fn set_heating_setpoint(&self, device_id: &DeviceId, value: f64) -> TwinResult<CommandAck> {
        self.execute(device_id, Command::HeatingSetpoint(value))
    }

    pub fn set_operating_mode(
        &self,
        device_id: &DeviceId,
        mode: impl Into<String>,
    ) -> TwinResult<CommandAck> {
        self.execute(device_id, Command::OperatingMode(mode.into()))
    }
}
