//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and shared wire types, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::process::{ExitStatus, Output};

use anyhow::Result;
use fleetjoin_common::{DeviceTypeManifest, Fleet};
use serde_json::{Map, Value};

use crate::domain::FleetjoinConfig;
use crate::domain::fleet::FleetFilter;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Which child streams `run_streaming` hands to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// stdout and stderr, interleaved in arrival order.
    Combined,
    /// stderr only; stdin and stdout stay attached to the terminal.
    StderrOnly,
}

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    ///
    /// No timeout is applied: the call returns when the process exits.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a program, handing output chunks to `on_chunk` as they arrive.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or its pipes fail.
    /// A non-zero exit is reported through the returned status, not as an error.
    async fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        capture: Capture,
        on_chunk: &mut dyn FnMut(&[u8]),
    ) -> Result<ExitStatus>;
}

// ── Device-facing Ports ───────────────────────────────────────────────────────

/// Shell access to a device. Non-zero exit is always an error.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    /// Run `command` on `address` and return its stdout.
    async fn exec_buffered(&self, address: &str, command: &str) -> Result<String>;

    /// Run `command` on `address`, streaming its output into `sink`.
    async fn exec(&self, address: &str, command: &str, sink: &mut dyn FnMut(&[u8]))
    -> Result<()>;
}

/// The privileged local network scan.
#[allow(async_fn_in_trait)]
pub trait DeviceScanner {
    /// Run the scan, streaming its text output into `on_output`.
    ///
    /// The output contains a `==> Selected device: <address>` line if the
    /// user picked a device.
    async fn scan(&self, on_output: &mut dyn FnMut(&[u8])) -> Result<()>;
}

// ── Fleet Backend Port ────────────────────────────────────────────────────────

/// The fleet-management API.
#[allow(async_fn_in_trait)]
pub trait FleetBackend {
    /// Full device-type catalog.
    async fn device_types(&self) -> Result<Vec<DeviceTypeManifest>>;
    /// Manifest for one device type.
    async fn device_type_manifest(&self, slug: &str) -> Result<DeviceTypeManifest>;
    /// Fleets matching `filter`.
    async fn fleets(&self, filter: &FleetFilter) -> Result<Vec<Fleet>>;
    /// Create a fleet owned by the current identity.
    async fn create_fleet(&self, name: &str, device_type: &str) -> Result<Fleet>;
    /// Change the recorded device type of a fleet.
    async fn update_fleet_device_type(&self, fleet_id: u64, device_type: &str) -> Result<()>;
    /// Username of the current identity, `None` when not authenticated.
    async fn whoami(&self) -> Result<Option<String>>;
    /// Whether the stored credentials are accepted.
    async fn is_logged_in(&self) -> Result<bool>;
    /// Verify `token`, adopt it for later calls, and return its username.
    async fn authenticate(&self, token: &str) -> Result<String>;
    /// Base device configuration for `fleet`, given the collected option values.
    async fn generate_config(
        &self,
        fleet: &Fleet,
        values: &Map<String, Value>,
    ) -> Result<Map<String, Value>>;
    /// Platform URL shown to the user.
    async fn platform_url(&self) -> Result<String>;
}

// ── Interaction Port ──────────────────────────────────────────────────────────

/// Validator used by [`Interaction::ask_text`]; `Err` carries the message shown.
pub type TextValidator<'a> = &'a dyn Fn(&str) -> std::result::Result<(), String>;

/// Every question the workflows may ask the user.
///
/// Cancelling a prompt surfaces as `Err`.
pub trait Interaction {
    /// Pick one of `options`; returns its index.
    fn select_one(&self, prompt: &str, options: &[String]) -> Result<usize>;
    /// Yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
    /// Free text, re-asked until `validate` accepts it.
    fn ask_text(&self, prompt: &str, default: Option<&str>, validate: TextValidator<'_>)
    -> Result<String>;
}

/// Interactive authentication, run when `join` starts without a session.
#[allow(async_fn_in_trait)]
pub trait LoginFlow {
    async fn login(&self) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Show a spinner with `label`.
    fn spin(&self, label: &str);
    /// Replace the spinner label.
    fn set_status(&self, label: &str);
    /// Remove the spinner.
    fn stop_spin(&self);
}

// ── Process-wide Ports ────────────────────────────────────────────────────────

/// One-shot "newer release available" check, initialised at process start.
pub trait UpdateNotice {
    fn has_update(&self) -> bool;
    fn notify(&self);
}

/// Abstracts loading and saving the configuration file.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when absent.
    fn load(&self) -> Result<FleetjoinConfig>;
    /// Persist the configuration.
    fn save(&self, config: &FleetjoinConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<std::path::PathBuf>;
}
