//! Payload transport: one encoded join command, spinner lifecycle, failures.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fleetjoin_cli::application::services::payload::{remove, send};
use fleetjoin_cli::domain::error::ProvisionError;
use fleetjoin_cli::domain::payload::join_payload;
use fleetjoin_cli::domain::provisioning::ProvisioningConfig;
use serde_json::{Map, Value, json};

use crate::mocks::{FakeShell, RecordingReporter};

fn config() -> ProvisioningConfig {
    let Value::Object(answers) = json!({
        "applicationId": 7,
        "hostname": "it's \"quoted\" $(rm -rf /)",
    }) else {
        unreachable!()
    };
    ProvisioningConfig::assemble(Map::new(), answers, "2.80.3")
}

#[tokio::test]
async fn send_issues_one_join_command_carrying_the_config() {
    let shell = FakeShell::device("raspberrypi4-64", "2.80.3");
    let reporter = RecordingReporter::new();
    let mut out = Vec::new();
    let config = config();

    send(&shell, &reporter, "10.0.0.5", &config, &mut out).await.unwrap();

    let joins = shell.commands_starting_with("os-config join");
    assert_eq!(joins.len(), 1);
    let payload = join_payload(&joins[0]).expect("wrapped payload");
    let decoded: Value = serde_json::from_slice(&STANDARD.decode(payload).unwrap()).unwrap();
    assert_eq!(decoded, serde_json::to_value(&config).unwrap());
    assert_eq!(out, b"Configuring...\nDone\n");
}

#[tokio::test]
async fn spinner_moves_from_connecting_to_configuring_and_stops() {
    let shell = FakeShell::device("raspberrypi4-64", "2.80.3");
    let reporter = RecordingReporter::new();

    send(&shell, &reporter, "10.0.0.5", &config(), &mut std::io::sink())
        .await
        .unwrap();

    let events = reporter.events();
    assert_eq!(events.first().map(String::as_str), Some("spin:[10.0.0.5] Connecting..."));
    assert!(events.contains(&"status:[10.0.0.5] Configuring...".to_string()));
    assert_eq!(events.last().map(String::as_str), Some("stop:"));
}

#[tokio::test]
async fn remote_failure_stops_the_spinner_and_reports_exit_code() {
    let shell = FakeShell::new().exit("os-config join", 2, "invalid config");
    let reporter = RecordingReporter::new();

    let err = send(&shell, &reporter, "10.0.0.5", &config(), &mut std::io::sink())
        .await
        .unwrap_err();

    match err.downcast_ref::<ProvisionError>() {
        Some(ProvisionError::RemoteCommandFailed { code, stderr, .. }) => {
            assert_eq!(*code, Some(2));
            assert_eq!(stderr, "invalid config");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(reporter.events().last().map(String::as_str), Some("stop:"));
}

#[tokio::test]
async fn remove_sends_leave() {
    let shell = FakeShell::device("raspberrypi4-64", "2.80.3");
    let reporter = RecordingReporter::new();
    let mut out = Vec::new();

    remove(&shell, &reporter, "10.0.0.5", &mut out).await.unwrap();

    assert_eq!(
        shell.calls(),
        [("10.0.0.5".to_string(), "os-config leave".to_string())]
    );
    assert_eq!(out, b"Leaving\n");
}
