//! Token login: verify, persist, report.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use fleetjoin_cli::application::ports::ConfigStore;
use fleetjoin_cli::application::services::login::store_token;
use fleetjoin_cli::domain::error::ProvisionError;
use fleetjoin_cli::infra::config::YamlConfigStore;

use crate::mocks::{FakeBackend, RecordingReporter};

#[tokio::test]
async fn accepted_token_is_saved() {
    let dir = tempfile::tempdir().unwrap();
    let store = YamlConfigStore::at(dir.path().join("config.yaml"));
    let backend = FakeBackend::new(Vec::new()).logged_out();
    let reporter = RecordingReporter::new();

    let user = store_token(&backend, &store, &reporter, " good-token\n")
        .await
        .unwrap();

    assert_eq!(user, "MyUser");
    assert_eq!(store.load().unwrap().api.token.as_deref(), Some("good-token"));
    assert_eq!(reporter.of_kind("success"), ["Successfully logged in as 'MyUser'"]);
}

#[tokio::test]
async fn rejected_token_is_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let store = YamlConfigStore::at(dir.path().join("config.yaml"));
    let backend = FakeBackend::new(Vec::new()).logged_out();
    let reporter = RecordingReporter::new();

    let err = store_token(&backend, &store, &reporter, "bad-token")
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::NotAuthenticated)
    ));
    assert!(!store.path().unwrap().exists());
}
