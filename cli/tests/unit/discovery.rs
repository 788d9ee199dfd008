//! Device discovery: explicit address, scan sentinel capture, passthrough.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use fleetjoin_cli::application::services::discovery::discover;
use fleetjoin_cli::domain::error::ProvisionError;

use crate::mocks::FakeScanner;

#[tokio::test]
async fn explicit_address_skips_the_scan() {
    let scanner = FakeScanner::selecting("10.0.0.9");
    let mut out = Vec::new();

    let address = discover(&scanner, Some("10.0.0.5"), &mut out).await.unwrap();

    assert_eq!(address, "10.0.0.5");
    assert_eq!(scanner.runs(), 0);
    assert!(out.is_empty());
}

#[tokio::test]
async fn scan_selection_is_captured_and_hidden() {
    let scanner = FakeScanner::selecting("192.168.1.44");
    let mut out = Vec::new();

    let address = discover(&scanner, None, &mut out).await.unwrap();

    assert_eq!(address, "192.168.1.44");
    assert_eq!(scanner.runs(), 1);
    let shown = String::from_utf8(out).unwrap();
    assert_eq!(shown, "Scanning 192.168.1.0/24 for devices (port 22222)...\n");
}

#[tokio::test]
async fn output_without_trailing_newline_is_still_forwarded() {
    let scanner = FakeScanner::new("==> Selected device: 10.1.1.1\nbye");
    let mut out = Vec::new();

    let address = discover(&scanner, None, &mut out).await.unwrap();

    assert_eq!(address, "10.1.1.1");
    assert_eq!(out, b"bye");
}

#[tokio::test]
async fn scan_without_selection_fails() {
    let scanner = FakeScanner::new("Scanning...\nNo devices found\n");
    let mut out = Vec::new();

    let err = discover(&scanner, None, &mut out).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::NoDeviceSelected)
    ));
    assert_eq!(out, b"Scanning...\nNo devices found\n");
}

#[tokio::test]
async fn blank_selection_fails() {
    let scanner = FakeScanner::new("Scanning...\n==> Selected device: \n");

    let err = discover(&scanner, None, &mut std::io::sink())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::NoDeviceSelected)
    ));
}
