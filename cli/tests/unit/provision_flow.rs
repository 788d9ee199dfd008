//! End-to-end join/leave runs over the fakes.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fleetjoin_cli::application::services::provision::{JoinOptions, Provisioner, Sinks};
use fleetjoin_cli::domain::error::ProvisionError;
use fleetjoin_cli::domain::payload::join_payload;
use fleetjoin_cli::domain::workflow::{JoinStep, LeaveStep, RunHistory};
use serde_json::{Value, json};

use crate::mocks::{
    FakeBackend, FakeLogin, FakeScanner, FakeShell, RecordingReporter, ScriptedInteraction, fleet,
};

struct World {
    backend: FakeBackend,
    shell: FakeShell,
    scanner: FakeScanner,
    ui: ScriptedInteraction,
    reporter: RecordingReporter,
}

impl World {
    fn new(backend: FakeBackend, shell: FakeShell) -> Self {
        Self {
            backend,
            shell,
            scanner: FakeScanner::selecting("10.0.0.5"),
            ui: ScriptedInteraction::new(),
            reporter: RecordingReporter::new(),
        }
    }

    fn provisioner(
        &self,
    ) -> Provisioner<'_, FakeBackend, FakeShell, FakeScanner, ScriptedInteraction, RecordingReporter>
    {
        Provisioner {
            backend: &self.backend,
            shell: &self.shell,
            scanner: &self.scanner,
            ui: &self.ui,
            reporter: &self.reporter,
        }
    }
}

fn pi4_world() -> World {
    World::new(
        FakeBackend::new(vec![fleet(7, "myuser/myfleet", "raspberrypi4-64")]),
        FakeShell::device("raspberrypi4-64", "2.80.3"),
    )
}

#[tokio::test]
async fn join_runs_every_step_and_sends_one_payload() {
    let world = pi4_world();
    let login = FakeLogin::default();
    let (mut scan, mut device) = (Vec::new(), Vec::new());
    let mut history = RunHistory::new();

    let report = world
        .provisioner()
        .join(
            &login,
            JoinOptions {
                address: Some("10.0.0.5"),
                fleet: Some("myuser/myfleet"),
            },
            Sinks {
                scan: &mut scan,
                device: &mut device,
            },
            &mut history,
        )
        .await
        .unwrap();

    assert_eq!(history.steps(), JoinStep::SEQUENCE);
    assert_eq!(history.failed_step(), None);
    assert_eq!(login.calls(), 0);
    assert_eq!(world.scanner.runs(), 0, "explicit address skips the scan");

    assert_eq!(report.device.type_slug, "raspberrypi4-64");
    assert_eq!(report.device.os_version, "2.80.3");
    assert_eq!(report.fleet.id, 7);
    assert_eq!(report.config.get("applicationId"), Some(&json!(7)));
    assert_eq!(report.config.get("version"), Some(&json!("2.80.3")));

    let joins = world.shell.commands_starting_with("os-config join");
    assert_eq!(joins.len(), 1);
    let decoded: Value =
        serde_json::from_slice(&STANDARD.decode(join_payload(&joins[0]).unwrap()).unwrap())
            .unwrap();
    assert_eq!(decoded, Value::Object(report.config.as_map().clone()));
    assert_eq!(device, b"Configuring...\nDone\n");

    assert!(
        world
            .reporter
            .of_kind("step")
            .contains(&"[10.0.0.5] Determining device type...".to_string())
    );
    assert_eq!(
        world.reporter.of_kind("success"),
        ["Device successfully joined https://dashboard.example.com!"]
    );
}

#[tokio::test]
async fn join_without_address_uses_the_scanned_device() {
    let world = pi4_world();
    let login = FakeLogin::default();
    let (mut scan, mut device) = (Vec::new(), Vec::new());
    let mut history = RunHistory::new();

    let report = world
        .provisioner()
        .join(
            &login,
            JoinOptions {
                address: None,
                fleet: Some("myuser/myfleet"),
            },
            Sinks {
                scan: &mut scan,
                device: &mut device,
            },
            &mut history,
        )
        .await
        .unwrap();

    assert_eq!(report.device.address, "10.0.0.5");
    assert_eq!(world.scanner.runs(), 1);
    let scan = String::from_utf8(scan).unwrap();
    assert!(scan.starts_with("Scanning 192.168.1.0/24"));
    assert!(!scan.contains("Selected device"));
}

#[tokio::test]
async fn logged_out_join_runs_the_login_flow_first() {
    let world = pi4_world();
    world.backend.logged_in.store(false, std::sync::atomic::Ordering::SeqCst);
    let login = FakeLogin::default();
    let mut history = RunHistory::new();

    world
        .provisioner()
        .join(
            &login,
            JoinOptions {
                address: Some("10.0.0.5"),
                fleet: Some("myuser/myfleet"),
            },
            Sinks {
                scan: &mut std::io::sink(),
                device: &mut std::io::sink(),
            },
            &mut history,
        )
        .await
        .unwrap();

    assert_eq!(login.calls(), 1);
}

#[tokio::test]
async fn incompatible_device_stops_before_anything_is_sent() {
    let world = World::new(
        FakeBackend::new(vec![fleet(7, "myuser/myfleet", "raspberrypi4-64")]),
        FakeShell::new().exit("os-config --version", 127, "sh: os-config: not found"),
    );
    let login = FakeLogin::default();
    let mut history = RunHistory::new();

    let err = world
        .provisioner()
        .join(
            &login,
            JoinOptions {
                address: Some("10.0.0.5"),
                fleet: None,
            },
            Sinks {
                scan: &mut std::io::sink(),
                device: &mut std::io::sink(),
            },
            &mut history,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::IncompatibleDevice { address, .. }) if address == "10.0.0.5"
    ));
    assert_eq!(history.failed_step(), Some(JoinStep::CheckCompatible));
    assert_eq!(
        history.steps(),
        [
            JoinStep::CheckLogin,
            JoinStep::DiscoverDevice,
            JoinStep::CheckCompatible
        ]
    );
    assert!(world.shell.commands_starting_with("os-config join").is_empty());
    assert!(world.backend.queries().is_empty());
    assert!(world.reporter.of_kind("success").is_empty());
}

#[tokio::test]
async fn leave_checks_the_agent_then_sends_leave() {
    let world = pi4_world();
    let mut device = Vec::new();
    let mut history = RunHistory::new();

    let address = world
        .provisioner()
        .leave(
            Some("10.0.0.5"),
            Sinks {
                scan: &mut std::io::sink(),
                device: &mut device,
            },
            &mut history,
        )
        .await
        .unwrap();

    assert_eq!(address, "10.0.0.5");
    assert_eq!(history.steps(), LeaveStep::SEQUENCE);
    assert_eq!(
        world
            .shell
            .calls()
            .into_iter()
            .map(|(_, c)| c)
            .collect::<Vec<_>>(),
        ["os-config --version", "os-config leave"]
    );
    assert_eq!(device, b"Leaving\n");
    assert_eq!(
        world.reporter.of_kind("success"),
        ["Device successfully left the platform."]
    );
}

#[tokio::test]
async fn leave_fails_when_the_scan_selects_nothing() {
    let mut world = pi4_world();
    world.scanner = FakeScanner::new("Scanning 192.168.1.0/24 for devices (port 22222)...\n");
    let mut history = RunHistory::new();

    let err = world
        .provisioner()
        .leave(
            None,
            Sinks {
                scan: &mut std::io::sink(),
                device: &mut std::io::sink(),
            },
            &mut history,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::NoDeviceSelected)
    ));
    assert_eq!(history.failed_step(), Some(LeaveStep::DiscoverDevice));
    assert!(world.shell.calls().is_empty());
}
