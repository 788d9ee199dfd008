//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod device;
pub mod error;
pub mod fleet;
pub mod payload;
pub mod provisioning;
pub mod stream;
pub mod workflow;

pub use config::{FleetjoinConfig, Subnet};
pub use device::Device;
pub use error::{ConfigError, ProvisionError};
pub use fleet::{FleetFilter, FleetRef};
pub use provisioning::ProvisioningConfig;
pub use stream::{LineAction, LineFilter};
pub use workflow::{JoinStep, LeaveStep, RunHistory, StepOutcome};
