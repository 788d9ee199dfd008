//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::application::ports::UpdateNotice;
use crate::commands;
use crate::infra::scanner::is_root;
use crate::infra::update::UpdateNotifier;

/// Add devices on your local network to a fleet
#[derive(Parser)]
#[command(
    name = "fleetjoin",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Answer prompts with their defaults; fail where there is none
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (`NO_COLOR` is honoured as well)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log debug information to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Move a device into a fleet
    Join(commands::join::JoinArgs),

    /// Remove a device from its fleet
    Leave(commands::leave::LeaveArgs),

    /// Store an API token
    Login(commands::login::LoginArgs),

    /// Check a registry secrets file
    ValidateSecrets(commands::secrets::ValidateSecretsArgs),

    /// Show version
    Version,

    #[command(hide = true, name = "_scan-devices")]
    ScanDevices(commands::internal::ScanArgs),
}

impl Command {
    /// Whether a finished run may be followed by an update notice.
    fn notifies_updates(&self) -> bool {
        matches!(self, Self::Join(_) | Self::Leave(_) | Self::Login(_))
    }
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            yes,
            quiet,
            no_color,
            debug: _,
            command,
        } = self;

        if matches!(command, Command::Version) {
            commands::version::run();
            return Ok(());
        }

        let app = AppContext::new(&AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes },
        })?;

        let notifier = command
            .notifies_updates()
            .then(|| UpdateNotifier::global(app.config.check_updates && !is_root()));

        match &command {
            Command::Join(args) => commands::join::run(&app, args).await?,
            Command::Leave(args) => commands::leave::run(&app, args).await?,
            Command::Login(args) => commands::login::run(&app, args).await?,
            Command::ValidateSecrets(args) => commands::secrets::run(&app, args)?,
            Command::ScanDevices(args) => commands::internal::scan_devices(&app, args).await?,
            Command::Version => {}
        }

        if let Some(notifier) = notifier {
            announce_update(notifier, quiet);
        }
        Ok(())
    }
}

/// Print the update notice after a finished command, if there is one to print.
fn announce_update(notice: &impl UpdateNotice, quiet: bool) {
    if !quiet && notice.has_update() {
        notice.notify();
    }
}
