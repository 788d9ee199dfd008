//! `fleetjoin join`: add a device to a fleet.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::provision::{JoinOptions, Provisioner, Sinks};
use crate::commands::{device_sink, warn_elevation};
use crate::domain::workflow::RunHistory;
use crate::infra::login::TokenLogin;

/// Arguments for the join command.
#[derive(Args)]
pub struct JoinArgs {
    /// Device address; the local network is scanned when omitted
    pub address: Option<String>,

    /// Fleet to join, as `owner/name` or a bare fleet name
    #[arg(short, long)]
    pub fleet: Option<String>,

    /// Show the output of the device agent
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the join command.
///
/// # Errors
///
/// Returns the error of the first failing step.
pub async fn run(app: &AppContext, args: &JoinArgs) -> Result<()> {
    let backend = app.backend()?;
    let shell = app.shell();
    let scanner = app.scanner()?;
    let ui = app.prompt();
    let reporter = app.reporter();
    let login = TokenLogin::new(&backend, &app.config_store, &reporter, app.non_interactive);

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
    let opts = JoinOptions {
        address: args.address.as_deref(),
        fleet: args.fleet.as_deref(),
    };
    let mut scan_out = std::io::stderr();
    let mut device_out = device_sink(args.verbose);
    let mut history = RunHistory::new();

    let result = provisioner
        .join(
            &login,
            opts,
            Sinks {
                scan: &mut scan_out,
                device: device_out.as_mut(),
            },
            &mut history,
        )
        .await;
    tracing::debug!(steps = ?history.steps(), failed = ?history.failed_step(), "join finished");

    let report = result?;
    app.output.kv("device", &report.device.address);
    app.output.kv("type  ", &report.device.type_slug);
    app.output.kv("fleet ", &report.fleet.slug);
    Ok(())
}
