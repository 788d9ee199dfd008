//! Application service: ask the device what it is.

use anyhow::{Context, Result};

use crate::application::ports::RemoteShell;
use crate::domain::device::{OS_RELEASE_PATH, parse_os_version, parse_type_slug};

async fn read_os_release(shell: &impl RemoteShell, address: &str) -> Result<String> {
    shell
        .exec_buffered(address, &format!("cat {OS_RELEASE_PATH}"))
        .await
        .with_context(|| format!("reading {OS_RELEASE_PATH} on {address}"))
}

/// Device-type slug from the device's `SLUG="..."` line.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or
/// [`crate::domain::ProvisionError::ProbeParse`] if the line is missing.
pub async fn type_slug(shell: &impl RemoteShell, address: &str) -> Result<String> {
    let os_release = read_os_release(shell, address).await?;
    Ok(parse_type_slug(&os_release)?)
}

/// OS version from the device's `VERSION_ID="..."` line.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or
/// [`crate::domain::ProvisionError::ProbeParse`] if the line is missing.
pub async fn os_version(shell: &impl RemoteShell, address: &str) -> Result<String> {
    let os_release = read_os_release(shell, address).await?;
    Ok(parse_os_version(&os_release)?)
}
