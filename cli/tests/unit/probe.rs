//! Device probe: type slug and OS version from `/etc/os-release`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use fleetjoin_cli::application::services::probe::{os_version, type_slug};
use fleetjoin_cli::domain::error::ProvisionError;

use crate::mocks::FakeShell;

#[tokio::test]
async fn reads_slug_and_version() {
    let shell = FakeShell::device("raspberrypi4-64", "2.80.3");

    assert_eq!(type_slug(&shell, "10.0.0.5").await.unwrap(), "raspberrypi4-64");
    assert_eq!(os_version(&shell, "10.0.0.5").await.unwrap(), "2.80.3");
    assert_eq!(
        shell.commands_starting_with("cat "),
        ["cat /etc/os-release", "cat /etc/os-release"]
    );
}

#[tokio::test]
async fn missing_slug_line_is_a_parse_error() {
    let shell = FakeShell::new().reply("cat /etc/os-release", "ID=\"balena-os\"\n");

    let err = type_slug(&shell, "10.0.0.5").await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::ProbeParse { .. })
    ));
}

#[tokio::test]
async fn unreadable_file_carries_context() {
    let shell = FakeShell::new().exit("cat /etc/os-release", 1, "Permission denied");

    let err = os_version(&shell, "10.0.0.5").await.unwrap_err();

    assert!(err.to_string().contains("/etc/os-release"));
    assert!(matches!(
        err.root_cause().downcast_ref::<ProvisionError>(),
        Some(ProvisionError::RemoteCommandFailed { .. })
    ));
}
