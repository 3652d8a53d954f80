//! Device Twin Core
//!
//! Versioned digital twins for registered devices:
//! - Device registry with opaque generated IDs
//! - Per-device desired/reported state behind a version counter
//! - Conditional patches gated on weak version tags
//! - Domain commands translated into desired-state patches

pub mod command;
pub mod device;
pub mod error;
pub mod etag;
pub mod runtime;
pub mod store;
pub mod twin;

pub use command::{Command, CommandAck, CommandTranslator, StatusRef};
pub use device::{Device, DeviceId, DeviceRegistry, NewDevice};
pub use error::{TwinError, TwinResult};
pub use etag::VersionTag;
pub use runtime::{Runtime, RuntimeConfig};
pub use store::TwinStore;
pub use twin::{patch_from_value, Patch, TwinSnapshot, TwinState};
