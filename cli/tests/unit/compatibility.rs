//! Compatibility gate: any probe failure means an incompatible device.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use fleetjoin_cli::application::services::compatibility::assert_compatible;
use fleetjoin_cli::domain::error::ProvisionError;

use crate::mocks::FakeShell;

#[tokio::test]
async fn agent_answering_version_is_compatible() {
    let shell = FakeShell::new().reply("os-config --version", "1.4.0\n");

    assert_compatible(&shell, "10.0.0.5").await.unwrap();

    assert_eq!(
        shell.calls(),
        [("10.0.0.5".to_string(), "os-config --version".to_string())]
    );
}

#[tokio::test]
async fn missing_agent_is_incompatible() {
    let shell = FakeShell::new().exit("os-config --version", 127, "sh: os-config: not found");

    let err = assert_compatible(&shell, "10.0.0.5").await.unwrap_err();

    match err.downcast_ref::<ProvisionError>() {
        Some(ProvisionError::IncompatibleDevice {
            address,
            min_version,
        }) => {
            assert_eq!(address, "10.0.0.5");
            assert_eq!(*min_version, "v2.14.0");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("incompatible"));
}

#[tokio::test]
async fn unreachable_device_is_incompatible_too() {
    let shell = FakeShell::new();

    let err = assert_compatible(&shell, "10.0.0.99").await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::IncompatibleDevice { .. })
    ));
    assert_eq!(shell.calls().len(), 1, "no retries");
}
