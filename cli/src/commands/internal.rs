//! Internal command `_scan-devices`.
//!
//! Invoked by `join` / `leave` (through `sudo` when needed), not by users.
//! Progress text and the final `==> Selected device: <address>` line go to
//! stderr, which the parent reads; the picker draws on stdout, which stays on
//! the user's terminal.

use anyhow::{Context, Result};
use clap::Args;
use console::Term;
use dialoguer::Select;

use crate::app::AppContext;
use crate::domain::config::Subnet;
use crate::domain::device::SELECTED_DEVICE_PREFIX;
use crate::infra::network::{PROBE_TIMEOUT, sweep};

/// Arguments for `_scan-devices`. The parent passes both; the config file is
/// only a fallback because it may not be visible under `sudo`.
#[derive(Args)]
pub struct ScanArgs {
    /// IPv4 CIDR to sweep
    #[arg(long)]
    pub subnet: Option<String>,

    /// Port that must be open
    #[arg(long)]
    pub port: Option<u16>,
}

/// Sweep the requested subnet and let the user pick a device.
///
/// Exits without a selection line when nothing answers or the user cancels.
///
/// # Errors
///
/// Returns an error if the subnet is invalid or the picker fails.
pub async fn scan_devices(app: &AppContext, args: &ScanArgs) -> Result<()> {
    let cidr = args.subnet.as_deref().unwrap_or(&app.config.scan.subnet);
    let port = args.port.unwrap_or(app.config.scan.port);
    let subnet = Subnet::parse(cidr)?;
    eprintln!("Scanning {cidr} for devices (port {port})...");

    let hosts = sweep(&subnet, port, PROBE_TIMEOUT).await;
    if hosts.is_empty() {
        eprintln!("No devices found");
        return Ok(());
    }

    let labels: Vec<String> = hosts.iter().map(ToString::to_string).collect();
    let choice = Select::new()
        .with_prompt("Select a device")
        .items(&labels)
        .default(0)
        .interact_on_opt(&Term::stdout())
        .context("device selection")?;

    if let Some(address) = choice.and_then(|i| labels.get(i)) {
        eprintln!("{SELECTED_DEVICE_PREFIX}{address}");
    }
    Ok(())
}
