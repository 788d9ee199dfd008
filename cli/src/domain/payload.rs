//! Wire contract with the on-device `os-config` agent.
//!
//! The configuration crosses an SSH command line, so it is base64-encoded
//! and only decoded by the remote shell: nothing outside the base64 alphabet
//! and the fixed wrapper below ever reaches the shell parser.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::domain::provisioning::ProvisioningConfig;

/// Exit 0 iff the device agent supports join/leave.
pub const VERSION_COMMAND: &str = "os-config --version";

/// Remove the device from its fleet.
pub const LEAVE_COMMAND: &str = "os-config leave";

const JOIN_PREFIX: &str = "os-config join '\"$(base64 -d <<< ";
const JOIN_SUFFIX: &str = ")\"'";

/// Build `os-config join '"$(base64 -d <<< <b64>)"'` for `config`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn join_command(config: &ProvisioningConfig) -> serde_json::Result<String> {
    let encoded = STANDARD.encode(config.to_json()?);
    Ok(format!("{JOIN_PREFIX}{encoded}{JOIN_SUFFIX}"))
}

/// Base64 payload embedded in a command built by [`join_command`].
#[must_use]
pub fn join_payload(command: &str) -> Option<&str> {
    command.strip_prefix(JOIN_PREFIX)?.strip_suffix(JOIN_SUFFIX)
}

/// Printable form of `command`. A join payload carries device credentials,
/// so it is replaced by `<config>`.
#[must_use]
pub fn redacted(command: &str) -> &str {
    if join_payload(command).is_some() {
        "os-config join <config>"
    } else {
        command
    }
}
