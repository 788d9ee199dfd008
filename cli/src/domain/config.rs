//! Domain types and validators for fleetjoin configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.fleetjoin/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FleetjoinConfig {
    /// Fleet-management API settings.
    pub api: ApiConfig,
    /// How devices are reached.
    pub ssh: SshConfig,
    /// Local network scan settings.
    pub scan: ScanConfig,
    /// Look for a newer release in the background.
    pub check_updates: bool,
}

impl Default for FleetjoinConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            ssh: SshConfig::default(),
            scan: ScanConfig::default(),
            check_updates: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub url: String,
    /// Shown to the user after a successful join.
    pub dashboard_url: String,
    /// API token saved by `fleetjoin login`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://api.balena-cloud.com".to_string(),
            dashboard_url: "https://dashboard.balena-cloud.com".to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SshConfig {
    /// SSH client binary.
    pub program: String,
    pub user: String,
    pub port: u16,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
            user: "root".to_string(),
            port: 22222,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    /// IPv4 CIDR probed by `_scan-devices`.
    pub subnet: String,
    /// Port that must be open for a host to count as a device.
    pub port: u16,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            subnet: "192.168.1.0/24".to_string(),
            port: 22222,
        }
    }
}

// ── Subnet ───────────────────────────────────────────────────────────────────

/// An IPv4 network small enough to sweep host by host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subnet {
    network: Ipv4Addr,
    prefix: u8,
}

impl Subnet {
    /// Parse `a.b.c.d/nn` with `16 <= nn <= 30`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSubnet`] for anything else.
    pub fn parse(cidr: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidSubnet(cidr.to_owned());
        let (addr, prefix) = cidr.split_once('/').ok_or_else(invalid)?;
        let addr: Ipv4Addr = addr.parse().map_err(|_| invalid())?;
        let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
        if !(16..=30).contains(&prefix) {
            return Err(invalid());
        }
        let mask = u32::MAX << (32 - u32::from(prefix));
        Ok(Self {
            network: Ipv4Addr::from(u32::from(addr) & mask),
            prefix,
        })
    }

    /// Usable host addresses (network and broadcast excluded), ascending.
    #[must_use]
    pub fn hosts(&self) -> Vec<Ipv4Addr> {
        let base = u32::from(self.network);
        let size = 1u32 << (32 - u32::from(self.prefix));
        (1..size - 1).map(|i| Ipv4Addr::from(base + i)).collect()
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
