//! Twin record: desired/reported state pair behind a version counter
//!
//! The merge policy lives here. A patch replaces each of its top-level keys
//! in `desired` wholesale; nested objects are never merged recursively, so
//! `{"heating": {"setpoint": 21}}` drops any other keys under `heating`.

use crate::error::{TwinError, TwinResult};
use crate::etag::VersionTag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Partial update of the desired state, keyed by top-level property
pub type Patch = Map<String, Value>;

/// Interpret an arbitrary JSON value as a patch. Only objects are accepted.
pub fn patch_from_value(value: Value) -> TwinResult<Patch> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(TwinError::invalid(format!(
            "patch must be a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Versioned desired/reported state for one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwinState {
    pub version: u64,
    pub desired: Map<String, Value>,
    /// Device-confirmed state. Nothing in this crate writes to it yet.
    pub reported: Map<String, Value>,
    pub updated_at: DateTime<Utc>,
}

impl TwinState {
    /// Fresh twin at version 1 with empty maps
    pub fn new() -> Self {
        Self {
            version: 1,
            desired: Map::new(),
            reported: Map::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn etag(&self) -> VersionTag {
        VersionTag::for_version(self.version)
    }

    /// Replace each top-level key of `desired` named by the patch, then
    /// advance the version by exactly one.
    pub(crate) fn apply_patch(&mut self, patch: Patch) {
        for (key, value) in patch {
            self.desired.insert(key, value);
        }
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

impl Default for TwinState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only copy of a twin paired with its derived tag
#[derive(Debug, Clone, PartialEq)]
pub struct TwinSnapshot {
    pub twin: TwinState,
    pub etag: VersionTag,
}

impl TwinSnapshot {
    pub(crate) fn of(twin: &TwinState) -> Self {
        Self {
            etag: twin.etag(),
            twin: twin.clone(),
        }
    }

    pub fn version(&self) -> u64 {
        self.twin.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: Value) -> Patch {
        patch_from_value(value).unwrap()
    }

    #[test]
    fn test_new_twin() {
        let twin = TwinState::new();
        assert_eq!(twin.version, 1);
        assert!(twin.desired.is_empty());
        assert!(twin.reported.is_empty());
        assert_eq!(twin.etag().as_str(), "W/\"v1\"");
    }

    #[test]
    fn test_shallow_replace() {
        let mut twin = TwinState::new();
        twin.apply_patch(patch(json!({"heating": {"setpoint": 21, "mode": "eco"}})));
        twin.apply_patch(patch(json!({"heating": {"setpoint": 19}})));

        assert_eq!(twin.version, 3);
        // sibling "mode" is gone
        assert_eq!(Value::Object(twin.desired), json!({"heating": {"setpoint": 19}}));
    }

    #[test]
    fn test_untouched_keys_survive() {
        let mut twin = TwinState::new();
        twin.apply_patch(patch(json!({"a": 1, "b": 2})));
        twin.apply_patch(patch(json!({"b": null})));

        assert_eq!(Value::Object(twin.desired), json!({"a": 1, "b": null}));
    }

    #[test]
    fn test_empty_patch_still_bumps_version() {
        let mut twin = TwinState::new();
        let before = twin.updated_at;
        twin.apply_patch(Patch::new());
        assert_eq!(twin.version, 2);
        assert!(twin.updated_at >= before);
    }

    #[test]
    fn test_non_object_patch_rejected() {
        for bad in [json!([1, 2]), json!("x"), json!(3), json!(null), json!(true)] {
            assert!(matches!(
                patch_from_value(bad),
                Err(TwinError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_twin_json_shape() {
        let json = serde_json::to_value(TwinState::new()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["desired"], json!({}));
        assert_eq!(json["reported"], json!({}));
        assert!(json.get("updatedAt").is_some());
    }
}
