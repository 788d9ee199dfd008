//! Application service: the `join` and `leave` workflows.
//!
//! Both are explicit state machines: each state carries what earlier steps
//! produced, and each transition is recorded in a [`RunHistory`]. The first
//! failing step ends the run; nothing is retried or rolled back.

use std::io::Write;

use anyhow::Result;
use fleetjoin_common::Fleet;

use crate::application::ports::{
    DeviceScanner, FleetBackend, Interaction, LoginFlow, ProgressReporter, RemoteShell,
};
use crate::application::services::{
    compatibility, config_builder, discovery, fleet_resolver, payload, probe,
};
use crate::domain::device::Device;
use crate::domain::provisioning::ProvisioningConfig;
use crate::domain::workflow::{JoinStep, LeaveStep, RunHistory};

/// The ports a workflow talks through.
pub struct Provisioner<'a, B, S, D, I, P> {
    pub backend: &'a B,
    pub shell: &'a S,
    pub scanner: &'a D,
    pub ui: &'a I,
    pub reporter: &'a P,
}

/// Where streamed output goes.
pub struct Sinks<'a> {
    /// Scan output, minus the selection sentinel.
    pub scan: &'a mut dyn Write,
    /// Output of the remote join/leave command.
    pub device: &'a mut dyn Write,
}

/// What `join` was asked to do.
#[derive(Debug, Default, Clone, Copy)]
pub struct JoinOptions<'a> {
    /// Device address; scanned for when absent.
    pub address: Option<&'a str>,
    /// `owner/name` slug or bare fleet name.
    pub fleet: Option<&'a str>,
}

/// Result of a successful `join`.
#[derive(Debug, Clone)]
pub struct JoinReport {
    pub device: Device,
    pub fleet: Fleet,
    pub config: ProvisioningConfig,
    pub platform_url: String,
}

enum JoinState {
    CheckLogin,
    DiscoverDevice,
    CheckCompatible {
        address: String,
    },
    ProbeType {
        address: String,
    },
    ResolveFleet {
        address: String,
        type_slug: String,
    },
    ProbeOsVersion {
        address: String,
        type_slug: String,
        fleet: Fleet,
    },
    BuildConfig {
        device: Device,
        fleet: Fleet,
    },
    Transmit {
        device: Device,
        fleet: Fleet,
        config: ProvisioningConfig,
    },
    Done(JoinReport),
}

impl JoinState {
    fn step(&self) -> JoinStep {
        match self {
            Self::CheckLogin => JoinStep::CheckLogin,
            Self::DiscoverDevice => JoinStep::DiscoverDevice,
            Self::CheckCompatible { .. } => JoinStep::CheckCompatible,
            Self::ProbeType { .. } => JoinStep::ProbeType,
            Self::ResolveFleet { .. } => JoinStep::ResolveFleet,
            Self::ProbeOsVersion { .. } => JoinStep::ProbeOsVersion,
            Self::BuildConfig { .. } => JoinStep::BuildConfig,
            Self::Transmit { .. } => JoinStep::Transmit,
            Self::Done(_) => JoinStep::Done,
        }
    }
}

enum LeaveState {
    DiscoverDevice,
    CheckCompatible { address: String },
    Transmit { address: String },
    Done { address: String },
}

impl LeaveState {
    fn step(&self) -> LeaveStep {
        match self {
            Self::DiscoverDevice => LeaveStep::DiscoverDevice,
            Self::CheckCompatible { .. } => LeaveStep::CheckCompatible,
            Self::Transmit { .. } => LeaveStep::Transmit,
            Self::Done { .. } => LeaveStep::Done,
        }
    }
}

impl<B, S, D, I, P> Provisioner<'_, B, S, D, I, P>
where
    B: FleetBackend,
    S: RemoteShell,
    D: DeviceScanner,
    I: Interaction,
    P: ProgressReporter,
{
    /// Join a device to a fleet.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step; `history` ends with it.
    pub async fn join(
        &self,
        login: &impl LoginFlow,
        opts: JoinOptions<'_>,
        sinks: Sinks<'_>,
        history: &mut RunHistory<JoinStep>,
    ) -> Result<JoinReport> {
        let mut state = JoinState::CheckLogin;
        loop {
            let step = state.step();
            tracing::debug!(%step, "join");
            if let JoinState::Done(report) = state {
                self.reporter.success(&format!(
                    "Device successfully joined {}!",
                    report.platform_url
                ));
                history.completed(step);
                return Ok(report);
            }
            let advanced = self
                .advance_join(state, login, opts, &mut *sinks.scan, &mut *sinks.device)
                .await;
            match advanced {
                Ok(next) => {
                    history.completed(step);
                    state = next;
                }
                Err(e) => {
                    tracing::debug!(%step, error = %e, "join step failed");
                    history.failed(step, &e);
                    return Err(e);
                }
            }
        }
    }

    async fn advance_join(
        &self,
        state: JoinState,
        login: &impl LoginFlow,
        opts: JoinOptions<'_>,
        scan_out: &mut dyn Write,
        device_out: &mut dyn Write,
    ) -> Result<JoinState> {
        let next = match state {
            JoinState::CheckLogin => {
                if !self.backend.is_logged_in().await? {
                    login.login().await?;
                }
                JoinState::DiscoverDevice
            }
            JoinState::DiscoverDevice => {
                let address =
                    discovery::discover(self.scanner, opts.address, &mut &mut *scan_out).await?;
                JoinState::CheckCompatible { address }
            }
            JoinState::CheckCompatible { address } => {
                compatibility::assert_compatible(self.shell, &address).await?;
                JoinState::ProbeType { address }
            }
            JoinState::ProbeType { address } => {
                self.reporter.step(&format!("[{address}] Determining device type..."));
                let type_slug = probe::type_slug(self.shell, &address).await?;
                JoinState::ResolveFleet { address, type_slug }
            }
            JoinState::ResolveFleet { address, type_slug } => {
                let fleet = fleet_resolver::resolve(
                    self.backend,
                    self.ui,
                    self.reporter,
                    &type_slug,
                    opts.fleet,
                )
                .await?;
                JoinState::ProbeOsVersion {
                    address,
                    type_slug,
                    fleet,
                }
            }
            JoinState::ProbeOsVersion {
                address,
                type_slug,
                fleet,
            } => {
                let os_version = probe::os_version(self.shell, &address).await?;
                JoinState::BuildConfig {
                    device: Device {
                        address,
                        type_slug,
                        os_version,
                    },
                    fleet,
                }
            }
            JoinState::BuildConfig { device, fleet } => {
                let config =
                    config_builder::build(self.backend, self.ui, &fleet, &device.os_version).await?;
                JoinState::Transmit {
                    device,
                    fleet,
                    config,
                }
            }
            JoinState::Transmit {
                device,
                fleet,
                config,
            } => {
                payload::send(
                    self.shell,
                    self.reporter,
                    &device.address,
                    &config,
                    &mut &mut *device_out,
                )
                .await?;
                let platform_url = self.backend.platform_url().await?;
                JoinState::Done(JoinReport {
                    device,
                    fleet,
                    config,
                    platform_url,
                })
            }
            JoinState::Done(report) => JoinState::Done(report),
        };
        Ok(next)
    }

    /// Remove a device from its fleet.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step; `history` ends with it.
    pub async fn leave(
        &self,
        address: Option<&str>,
        sinks: Sinks<'_>,
        history: &mut RunHistory<LeaveStep>,
    ) -> Result<String> {
        let mut state = LeaveState::DiscoverDevice;
        loop {
            let step = state.step();
            tracing::debug!(%step, "leave");
            let result = match state {
                LeaveState::Done { address } => {
                    self.reporter.success("Device successfully left the platform.");
                    history.completed(step);
                    return Ok(address);
                }
                LeaveState::DiscoverDevice => {
                    discovery::discover(self.scanner, address, &mut &mut *sinks.scan)
                        .await
                        .map(|address| LeaveState::CheckCompatible { address })
                }
                LeaveState::CheckCompatible { address } => {
                    compatibility::assert_compatible(self.shell, &address)
                        .await
                        .map(|()| LeaveState::Transmit { address })
                }
                LeaveState::Transmit { address } => {
                    payload::remove(self.shell, self.reporter, &address, &mut &mut *sinks.device)
                        .await
                        .map(|()| LeaveState::Done { address })
                }
            };
            match result {
                Ok(next) => {
                    history.completed(step);
                    state = next;
                }
                Err(e) => {
                    tracing::debug!(%step, error = %e, "leave step failed");
                    history.failed(step, &e);
                    return Err(e);
                }
            }
        }
    }
}
