//! Error taxonomy for registry, store and command operations

use crate::device::DeviceId;
use crate::etag::VersionTag;
use thiserror::Error;

/// Failures surfaced by the twin core.
///
/// None of these are retried internally. A `VersionConflict` in particular is
/// handed back so the caller can re-read the twin and decide what to do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TwinError {
    #[error("device not found: {0}")]
    NotFound(String),

    #[error("version conflict: expected {expected}, current {current}")]
    VersionConflict {
        expected: String,
        current: VersionTag,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl TwinError {
    pub(crate) fn not_found(id: &DeviceId) -> Self {
        Self::NotFound(id.to_string())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}

pub type TwinResult<T> = Result<T, TwinError>;
