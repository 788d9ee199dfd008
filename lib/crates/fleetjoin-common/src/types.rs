use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A fleet record as returned by the fleet-management API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fleet {
    pub id: u64,
    /// Display name. Not unique across owners.
    #[serde(rename = "app_name")]
    pub name: String,
    /// Globally unique, usually `owner/name`.
    pub slug: String,
    pub device_type: String,
    /// Filled in locally from the device-type catalog; never sent by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
}

impl Fleet {
    /// Owner part of a namespaced slug, if any.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.slug.split_once('/').map(|(owner, _)| owner)
    }
}

/// Body of a fleet creation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewFleet {
    pub app_name: String,
    pub device_type: String,
}

/// Device-type catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceTypeManifest {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    /// Instruction-set architecture, e.g. `aarch64`.
    pub arch: String,
    #[serde(default)]
    pub options: Vec<ManifestOption>,
}

/// A configurable option declared by a device-type manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestOption {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: OptionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ManifestOption {
    /// Prompt text, falling back to the option name.
    #[must_use]
    pub fn prompt(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.name)
    }
}

/// Declared kind of a manifest option. Unknown kinds are treated as free text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    List,
    Number,
    Boolean,
    Checkbox,
    #[default]
    #[serde(other)]
    Text,
}

/// One entry of a `list` option: either a bare value or a labelled value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OptionChoice {
    Labeled { name: String, value: Value },
    Plain(Value),
}

impl OptionChoice {
    /// Text shown to the user.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Labeled { name, .. } => name.clone(),
            Self::Plain(Value::String(s)) => s.clone(),
            Self::Plain(other) => other.to_string(),
        }
    }

    /// Value stored in the configuration.
    #[must_use]
    pub fn value(&self) -> &Value {
        match self {
            Self::Labeled { value, .. } | Self::Plain(value) => value,
        }
    }
}

/// OData collection envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ODataList<T> {
    pub d: Vec<T>,
}

/// Response of the identity endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhoAmI {
    pub username: String,
}
