//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

/// Everything that can end (or, for `NameConflict`, interrupt) a provisioning run.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("You are not logged in. Run 'fleetjoin login' first.")]
    NotAuthenticated,

    #[error("No device selected")]
    NoDeviceSelected,

    #[error(
        "Device \"{address}\" is incompatible and cannot join or leave a fleet.\n\
         Please select or provision a device running an OS newer than {min_version}."
    )]
    IncompatibleDevice {
        address: String,
        min_version: &'static str,
    },

    #[error("Failed to determine {field} from {path}")]
    ProbeParse {
        field: &'static str,
        path: &'static str,
    },

    #[error("\"{0}\" is not a valid device type")]
    UnknownDeviceType(String),

    #[error("No fleet found with a matching device type")]
    NoCompatibleFleet,

    #[error("You already have a fleet named '{0}'; please choose another.")]
    NameConflict(String),

    #[error("Fleet creation declined")]
    CreationDeclined,

    #[error("{operation} failed: {detail}")]
    BackendRequestFailed {
        operation: &'static str,
        detail: String,
    },

    #[error("Registry secrets failed validation: {0}")]
    SchemaValidationFailed(String),

    #[error("[{address}] '{command}' exited with {}{}", exit_display(*.code), stderr_suffix(.stderr))]
    RemoteCommandFailed {
        address: String,
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_display(code: Option<i32>) -> String {
    code.map_or_else(|| "no exit code (signal)".to_string(), |c| format!("code {c}"))
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid scan subnet '{0}': expected IPv4 CIDR with prefix 16..=30, e.g. 192.168.1.0/24")]
    InvalidSubnet(String),

    #[error("Invalid fleet name '{name}': {reason}")]
    InvalidFleetName { name: String, reason: &'static str },
}
