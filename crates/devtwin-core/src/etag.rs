//! Weak entity tags derived from a twin's version counter
//!
//! Tags are never stored. They are recomputed from `version` on every read
//! and every successful write, so equal versions always yield equal tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally visible version tag, rendered as `W/"v<version>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTag(String);

impl VersionTag {
    const PREFIX: &'static str = "W/\"v";
    const SUFFIX: &'static str = "\"";

    /// Derive the tag for a version
    pub fn for_version(version: u64) -> Self {
        Self(format!("{}{version}{}", Self::PREFIX, Self::SUFFIX))
    }

    /// Recover the version a well-formed tag was derived from
    pub fn parse_version(raw: &str) -> Option<u64> {
        raw.strip_prefix(Self::PREFIX)?
            .strip_suffix(Self::SUFFIX)?
            .parse()
            .ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact comparison against a caller-supplied tag
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VersionTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
