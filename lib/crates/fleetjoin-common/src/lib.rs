pub mod registry_secrets;
pub mod types;

pub use registry_secrets::{
    RegistryCredentials, RegistrySecrets, RegistrySecretsError, parse_registry_secrets,
    validate_registry_secrets,
};
pub use types::*;
