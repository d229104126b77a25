//! Configuration for EventPass.

use serde::{Deserialize, Serialize};

use eventpass_perms::PermissionPolicy;

use crate::error::{EventPassError, Result};

/// Default prefix prepended to every storage key.
pub const DEFAULT_KEY_PREFIX: &str = "@eventpass/";

/// What a context does when persisting a collection fails.
///
/// The in-memory change is kept either way; the next successful save of
/// the same collection writes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveErrorPolicy {
    /// Return the storage error to the caller.
    #[default]
    Propagate,
    /// Log a warning and report success.
    LogAndSwallow,
}

/// Storage configuration shared by every context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Prefix for collection keys.
    pub key_prefix: String,
    /// Handling of failed saves.
    pub save_errors: SaveErrorPolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            save_errors: SaveErrorPolicy::default(),
        }
    }
}

/// Configuration for [`EventPass`](crate::EventPass).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventPassConfig {
    /// Permission policy.
    pub permissions: PermissionPolicy,
    /// Storage configuration.
    pub storage: StorageConfig,
}

impl EventPassConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EventPassError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventpass_perms::OrgMatchPolicy;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(
            EventPassConfig::from_json("{}").unwrap(),
            EventPassConfig::default()
        );
    }

    #[test]
    fn test_partial_override() {
        let config = EventPassConfig::from_json(
            r#"{
                "permissions": { "org_match": "require_explicit" },
                "storage": { "save_errors": "log_and_swallow" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.permissions.org_match, OrgMatchPolicy::RequireExplicit);
        assert_eq!(config.storage.save_errors, SaveErrorPolicy::LogAndSwallow);
        assert_eq!(config.storage.key_prefix, DEFAULT_KEY_PREFIX);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = EventPassConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, EventPassError::Config(_)));
    }
}
