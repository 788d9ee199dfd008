//! Validation of private-registry credentials supplied from outside the process.
//!
//! Accepted shape:
//!
//! ```json
//! {
//!   "docker.example.com": {"username": "ann", "password": "hunter2"},
//!   "https://idx.docker.io/v1/": {"username": "mck", "password": "cze14"}
//! }
//! ```
//!
//! Every key must be non-empty and map to an object holding exactly the
//! string fields `username` and `password`. Nothing else is allowed at
//! either level. An empty object is valid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const CREDENTIAL_FIELDS: [&str; 2] = ["username", "password"];

/// Credentials for a single registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
}

/// Registry address to credentials.
pub type RegistrySecrets = BTreeMap<String, RegistryCredentials>;

#[derive(Debug, Error)]
pub enum RegistrySecretsError {
    #[error("registry secrets are not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("{}", .0.join(", "))]
    Schema(Vec<String>),
}

/// Parse `json` and validate it against the registry secrets schema.
///
/// # Errors
///
/// Returns [`RegistrySecretsError::InvalidJson`] when `json` does not parse
/// and [`RegistrySecretsError::Schema`] listing every violation otherwise.
pub fn parse_registry_secrets(json: &str) -> Result<RegistrySecrets, RegistrySecretsError> {
    let value: Value = serde_json::from_str(json)?;
    validate_registry_secrets(&value)
}

/// Validate an already-parsed document.
///
/// All violations are collected before failing so the caller sees the full
/// list in one pass.
///
/// # Errors
///
/// Returns [`RegistrySecretsError::Schema`] if any constraint is violated.
pub fn validate_registry_secrets(value: &Value) -> Result<RegistrySecrets, RegistrySecretsError> {
    let Value::Object(registries) = value else {
        return Err(RegistrySecretsError::Schema(vec![format!(
            "data should be object (got {})",
            type_name(value)
        )]));
    };

    let mut errors = Vec::new();
    let mut secrets = RegistrySecrets::new();

    for (address, entry) in registries {
        if address.is_empty() {
            errors.push("data should NOT have additional properties ('')".to_string());
            continue;
        }
        let path = format!("data['{address}']");
        let Value::Object(fields) = entry else {
            errors.push(format!("{path} should be object (got {})", type_name(entry)));
            continue;
        };

        let before = errors.len();
        for extra in fields.keys().filter(|k| !CREDENTIAL_FIELDS.contains(&k.as_str())) {
            errors.push(format!("{path} should NOT have additional properties ('{extra}')"));
        }
        for field in CREDENTIAL_FIELDS {
            match fields.get(field) {
                None => errors.push(format!("{path} should have required property '{field}'")),
                Some(Value::String(_)) => {}
                Some(other) => errors.push(format!(
                    "{path}.{field} should be string (got {})",
                    type_name(other)
                )),
            }
        }
        if errors.len() > before {
            continue;
        }

        let username = fields.get("username").and_then(Value::as_str).unwrap_or_default();
        let password = fields.get("password").and_then(Value::as_str).unwrap_or_default();
        secrets.insert(
            address.clone(),
            RegistryCredentials {
                username: username.to_owned(),
                password: password.to_owned(),
            },
        );
    }

    if errors.is_empty() {
        Ok(secrets)
    } else {
        Err(RegistrySecretsError::Schema(errors))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
