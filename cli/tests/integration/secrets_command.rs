//! Integration tests for `fleetjoin validate-secrets`.

#![allow(clippy::expect_used)]

use std::io::Write;

use predicates::prelude::*;

use crate::cli_tests::fleetjoin;

fn secrets_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write secrets");
    file
}

#[test]
fn test_valid_secrets_are_accepted() {
    let file = secrets_file(
        r#"{
            "docker.example.com": {"username": "ann", "password": "hunter2"},
            "https://idx.docker.io/v1/": {"username": "mck", "password": "cze14"}
        }"#,
    );
    fleetjoin()
        .arg("validate-secrets")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid (2 registries)"))
        .stdout(predicate::str::contains("docker.example.com"));
}

#[test]
fn test_every_violation_is_reported() {
    let file = secrets_file(
        r#"{
            "docker.example.com": {"username": "ann"},
            "quay.io": {"username": "bob", "password": 5, "token": "x"}
        }"#,
    );
    fleetjoin()
        .arg("validate-secrets")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "data['docker.example.com'] should have required property 'password'",
        ))
        .stderr(predicate::str::contains(
            "data['quay.io'] should NOT have additional properties ('token')",
        ))
        .stderr(predicate::str::contains("data['quay.io'].password should be string"));
}

#[test]
fn test_invalid_json_is_rejected() {
    let file = secrets_file("{not json");
    fleetjoin()
        .arg("validate-secrets")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_missing_file_is_reported() {
    fleetjoin()
        .args(["validate-secrets", "/nonexistent/secrets.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "cannot read /nonexistent/secrets.json: No such file or directory",
        ));
}
