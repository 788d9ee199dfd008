//! Application context: unified state passed to every command handler.
//!
//! `AppContext` owns the terminal output settings, the loaded configuration
//! and the non-interactive switch, and builds the infrastructure adapters
//! commands need from them.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::FleetjoinConfig;
use crate::infra::backend::HttpFleetBackend;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::prompt::TerminalPrompt;
use crate::infra::scanner::SudoScanner;
use crate::infra::ssh::SshShell;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `FLEETJOIN_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Where the configuration was loaded from.
    pub config_store: YamlConfigStore,
    /// Configuration loaded at startup.
    pub config: FleetjoinConfig,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `FLEETJOIN_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("FLEETJOIN_YES").is_ok();
        let config_store = YamlConfigStore::default();
        let config = config_store.load()?;

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            config_store,
            config,
            non_interactive: flags.behaviour.yes || ci_env,
        })
    }

    /// Prompts honouring the non-interactive switch.
    #[must_use]
    pub fn prompt(&self) -> TerminalPrompt {
        TerminalPrompt::new(self.non_interactive)
    }

    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn backend(&self) -> Result<HttpFleetBackend> {
        HttpFleetBackend::new(&self.config.api)
    }

    #[must_use]
    pub fn shell(&self) -> SshShell<TokioCommandRunner> {
        SshShell::new(TokioCommandRunner::new(), self.config.ssh.clone())
    }

    /// # Errors
    ///
    /// Returns an error if the current executable cannot be located.
    pub fn scanner(&self) -> Result<SudoScanner<TokioCommandRunner>> {
        SudoScanner::current(TokioCommandRunner::new(), self.config.scan.clone())
    }
}
