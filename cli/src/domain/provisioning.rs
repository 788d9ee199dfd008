//! The configuration payload handed to the device agent on `join`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key carrying the detected OS version.
pub const VERSION_KEY: &str = "version";

/// Connectivity mode for which `connectivity` and `files` must not be sent.
pub const CONNMAN: &str = "connman";

const CONNECTIVITY_KEY: &str = "connectivity";
const FILES_KEY: &str = "files";

/// Key/value configuration applied by `os-config join`.
///
/// Built once by [`ProvisioningConfig::assemble`] and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvisioningConfig(Map<String, Value>);

impl ProvisioningConfig {
    /// Overlay `answers` and the OS version on top of `base`, then drop fields
    /// that do not apply to the chosen connectivity mode.
    #[must_use]
    pub fn assemble(base: Map<String, Value>, answers: Map<String, Value>, os_version: &str) -> Self {
        let mut merged = base;
        merged.extend(answers);
        merged.insert(VERSION_KEY.to_owned(), Value::String(os_version.to_owned()));
        if merged.get(CONNECTIVITY_KEY).and_then(Value::as_str) == Some(CONNMAN) {
            merged.remove(CONNECTIVITY_KEY);
            merged.remove(FILES_KEY);
        }
        Self(merged)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }
}
