//! Application service: deliver join/leave commands to a device.
//!
//! A spinner runs for the whole remote call: "Connecting..." until the first
//! line of output arrives, "Configuring..." afterwards. Remote output is
//! copied unmodified to `out`.

use std::io::Write;

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, RemoteShell};
use crate::domain::payload::{LEAVE_COMMAND, join_command};
use crate::domain::provisioning::ProvisioningConfig;
use crate::domain::stream::{LineAction, LineFilter};

/// Send `config` to the device agent at `address`.
///
/// # Errors
///
/// Returns the remote failure (non-zero exit carries the exit code and stderr).
pub async fn send(
    shell: &impl RemoteShell,
    reporter: &impl ProgressReporter,
    address: &str,
    config: &ProvisioningConfig,
    out: &mut impl Write,
) -> Result<()> {
    let command = join_command(config).context("serializing provisioning config")?;
    tracing::debug!(address, bytes = command.len(), "sending join command");
    exec_with_spinner(shell, reporter, address, &command, out).await
}

/// Ask the device agent at `address` to leave its fleet.
///
/// # Errors
///
/// Returns the remote failure.
pub async fn remove(
    shell: &impl RemoteShell,
    reporter: &impl ProgressReporter,
    address: &str,
    out: &mut impl Write,
) -> Result<()> {
    tracing::debug!(address, "sending leave command");
    exec_with_spinner(shell, reporter, address, LEAVE_COMMAND, out).await
}

async fn exec_with_spinner(
    shell: &impl RemoteShell,
    reporter: &impl ProgressReporter,
    address: &str,
    command: &str,
    out: &mut impl Write,
) -> Result<()> {
    let configuring = format!("[{address}] Configuring...");
    reporter.spin(&format!("[{address}] Connecting..."));

    let mut write_error: Option<std::io::Error> = None;
    let result = {
        let mut filter = LineFilter::new(|_: &str| {
            reporter.set_status(&configuring);
            LineAction::Forward
        });
        let result = shell
            .exec(address, command, &mut |chunk| {
                let forward = filter.push(chunk);
                if let Err(e) = out.write_all(&forward)
                    && write_error.is_none()
                {
                    write_error = Some(e);
                }
            })
            .await;
        let rest = filter.finish();
        if let Err(e) = out.write_all(&rest)
            && write_error.is_none()
        {
            write_error = Some(e);
        }
        result
    };
    reporter.stop_spin();

    result?;
    if let Some(e) = write_error {
        return Err(e).context("forwarding device output");
    }
    out.flush()?;
    Ok(())
}
