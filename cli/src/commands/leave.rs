//! `fleetjoin leave`: remove a device from its fleet.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::provision::{Provisioner, Sinks};
use crate::commands::{device_sink, warn_elevation};
use crate::domain::workflow::RunHistory;

/// Arguments for the leave command.
#[derive(Args)]
pub struct LeaveArgs {
    /// Device address; the local network is scanned when omitted
    pub address: Option<String>,

    /// Show the output of the device agent
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the leave command. Needs no login.
///
/// # Errors
///
/// Returns the error of the first failing step.
pub async fn run(app: &AppContext, args: &LeaveArgs) -> Result<()> {
    let backend = app.backend()?;
    let shell = app.shell();
    let scanner = app.scanner()?;
    let ui = app.prompt();
    let reporter = app.reporter();

    if args.address.is_none() {
        warn_elevation(&scanner, &reporter);
    }

    let provisioner = Provisioner {
        backend: &backend,
        shell: &shell,
        scanner: &scanner,
        ui: &ui,
        reporter: &reporter,
    };
    let mut scan_out = std::io::stderr();
    let mut device_out = device_sink(args.verbose);
    let mut history = RunHistory::new();

    let result = provisioner
        .leave(
            args.address.as_deref(),
            Sinks {
                scan: &mut scan_out,
                device: device_out.as_mut(),
            },
            &mut history,
        )
        .await;
    tracing::debug!(steps = ?history.steps(), failed = ?history.failed_step(), "leave finished");
    result.map(|_| ())
}
