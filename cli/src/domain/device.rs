//! Device identity as reported by the device itself.
//!
//! Pure parsing of `/etc/os-release` and of scan output. No I/O.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::ProvisionError;

/// File read on the device to learn its type and OS version.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Oldest OS release whose agent understands `join` / `leave`.
pub const MIN_OS_VERSION: &str = "v2.14.0";

/// Sentinel printed by the scan subprocess once the user picked a device.
pub const SELECTED_DEVICE_PREFIX: &str = "==> Selected device: ";

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"(?m)^SLUG="([^"]+)"$"#).expect("valid regex")
});

static VERSION_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"(?m)^VERSION_ID="([^"]+)"$"#).expect("valid regex")
});

static SELECTED_DEVICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^==> Selected device: (.*)$").expect("valid regex")
});

/// A device reachable on the local network. Rebuilt on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub address: String,
    pub type_slug: String,
    pub os_version: String,
}

/// Extract the device-type slug from `/etc/os-release` content.
///
/// # Errors
///
/// Returns [`ProvisionError::ProbeParse`] if no `SLUG="..."` line is present.
pub fn parse_type_slug(os_release: &str) -> Result<String, ProvisionError> {
    capture(&SLUG_RE, os_release).ok_or(ProvisionError::ProbeParse {
        field: "device type",
        path: OS_RELEASE_PATH,
    })
}

/// Extract the OS version from `/etc/os-release` content.
///
/// # Errors
///
/// Returns [`ProvisionError::ProbeParse`] if no `VERSION_ID="..."` line is present.
pub fn parse_os_version(os_release: &str) -> Result<String, ProvisionError> {
    capture(&VERSION_ID_RE, os_release).ok_or(ProvisionError::ProbeParse {
        field: "OS version",
        path: OS_RELEASE_PATH,
    })
}

/// Address carried by a `==> Selected device: <address>` line, if `line` is one.
///
/// `line` must not include its terminator. A blank address is no selection.
#[must_use]
pub fn parse_selected_device(line: &str) -> Option<String> {
    let address = SELECTED_DEVICE_RE.captures(line)?[1].trim().to_owned();
    (!address.is_empty()).then_some(address)
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|c| c[1].to_owned())
}
