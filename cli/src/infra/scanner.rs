//! Infrastructure implementation of the `DeviceScanner` port.
//!
//! The scan needs raw network access, so it runs as a separate
//! `fleetjoin _scan-devices` process, elevated with `sudo` unless the current
//! user already is root. Its stderr carries the progress text and the
//! selection sentinel; its stdin/stdout stay on the terminal for the picker.
//!
//! `sudo` resets the environment, so the child cannot be relied on to find
//! the same config file: the subnet and port travel on its command line.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{Capture, CommandRunner, DeviceScanner};
use crate::domain::config::ScanConfig;

/// Hidden subcommand that performs the scan.
pub const SCAN_SUBCOMMAND: &str = "_scan-devices";

/// Whether the process already runs with root privileges.
#[must_use]
pub fn is_root() -> bool {
    std::env::var("USER").is_ok_and(|u| u == "root")
        || std::env::var("SUDO_UID").is_ok()
        || dirs::home_dir().is_some_and(|h| h == std::path::Path::new("/root"))
}

pub struct SudoScanner<R> {
    runner: R,
    exe: PathBuf,
    elevate: bool,
    scan: ScanConfig,
}

impl<R: CommandRunner> SudoScanner<R> {
    /// Scanner re-running the current executable.
    ///
    /// # Errors
    ///
    /// Returns an error if the current executable cannot be located.
    pub fn current(runner: R, scan: ScanConfig) -> Result<Self> {
        let exe = std::env::current_exe().context("cannot locate the fleetjoin executable")?;
        Ok(Self::new(runner, exe, !is_root(), scan))
    }

    #[must_use]
    pub fn new(runner: R, exe: PathBuf, elevate: bool, scan: ScanConfig) -> Self {
        Self {
            runner,
            exe,
            elevate,
            scan,
        }
    }

    /// Program and arguments of the scan child.
    #[must_use]
    pub fn command(&self) -> (String, Vec<String>) {
        let exe = self.exe.to_string_lossy().into_owned();
        let mut args = vec![
            SCAN_SUBCOMMAND.to_string(),
            "--subnet".to_string(),
            self.scan.subnet.clone(),
            "--port".to_string(),
            self.scan.port.to_string(),
        ];
        if self.elevate {
            args.insert(0, exe);
            ("sudo".to_string(), args)
        } else {
            (exe, args)
        }
    }

    /// Whether the scan will prompt for a sudo password.
    #[must_use]
    pub fn elevates(&self) -> bool {
        self.elevate
    }
}

impl<R: CommandRunner> DeviceScanner for SudoScanner<R> {
    async fn scan(&self, on_output: &mut dyn FnMut(&[u8])) -> Result<()> {
        let (program, args) = self.command();
        tracing::debug!(%program, ?args, "starting device scan");

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let status = self
            .runner
            .run_streaming(&program, &args, Capture::StderrOnly, on_output)
            .await?;
        tracing::debug!(?status, "device scan finished");
        Ok(())
    }
}
