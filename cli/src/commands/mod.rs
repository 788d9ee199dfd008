//! Command implementations

pub mod internal;
pub mod join;
pub mod leave;
pub mod login;
pub mod secrets;
pub mod version;

use std::io::Write;

use crate::application::ports::{CommandRunner, ProgressReporter};
use crate::infra::scanner::SudoScanner;

/// Where the device agent's output goes: stderr with `--verbose`, nowhere otherwise.
fn device_sink(verbose: bool) -> Box<dyn Write> {
    if verbose {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::sink())
    }
}

fn warn_elevation<R: CommandRunner>(scanner: &SudoScanner<R>, reporter: &impl ProgressReporter) {
    if scanner.elevates() {
        reporter.warn("Scanning the local network needs root; sudo may ask for your password.");
    }
}
