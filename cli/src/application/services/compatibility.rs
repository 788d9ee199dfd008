//! Application service: make sure the device agent speaks join/leave.

use anyhow::Result;

use crate::application::ports::RemoteShell;
use crate::domain::device::MIN_OS_VERSION;
use crate::domain::error::ProvisionError;
use crate::domain::payload::VERSION_COMMAND;

/// Probe the device agent once.
///
/// Any failure (unreachable host, missing `os-config`, non-zero exit) is
/// reported as [`ProvisionError::IncompatibleDevice`].
///
/// # Errors
///
/// Returns [`ProvisionError::IncompatibleDevice`] unless the probe exits 0.
pub async fn assert_compatible(shell: &impl RemoteShell, address: &str) -> Result<()> {
    match shell.exec_buffered(address, VERSION_COMMAND).await {
        Ok(version) => {
            tracing::debug!(address, agent_version = version.trim(), "device agent is compatible");
            Ok(())
        }
        Err(e) => {
            tracing::debug!(address, error = %format!("{e:#}"), "compatibility probe failed");
            Err(ProvisionError::IncompatibleDevice {
                address: address.to_owned(),
                min_version: MIN_OS_VERSION,
            }
            .into())
        }
    }
}
