//! Integration tests for the hidden `_scan-devices` subcommand.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::cli_tests::fleetjoin;

#[test]
fn test_scan_subnet_argument_overrides_config() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "scan:\n  subnet: \"10.1.0.0/24\"\n").expect("write config");
    fleetjoin()
        .env("FLEETJOIN_CONFIG", &path)
        .args(["_scan-devices", "--subnet", "172.16.0.0/8", "--port", "22222"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid scan subnet '172.16.0.0/8'"))
        .stderr(predicate::str::contains("10.1.0.0/24").not());
}

#[test]
fn test_scan_port_must_be_a_port_number() {
    fleetjoin()
        .args(["_scan-devices", "--port", "70000"])
        .assert()
        .code(2);
}
