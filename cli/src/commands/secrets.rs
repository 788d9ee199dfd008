//! `fleetjoin validate-secrets`: check a registry secrets file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fleetjoin_common::parse_registry_secrets;

use crate::app::AppContext;
use crate::domain::error::ProvisionError;

/// Arguments for the validate-secrets command.
#[derive(Args)]
pub struct ValidateSecretsArgs {
    /// JSON file mapping registry hosts to `{ username, password }`
    pub file: PathBuf,
}

/// Run the validate-secrets command.
///
/// # Errors
///
/// Returns [`ProvisionError::SchemaValidationFailed`] listing every violation,
/// or an error if the file cannot be read.
pub fn run(app: &AppContext, args: &ValidateSecretsArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    let secrets = parse_registry_secrets(&text)
        .map_err(|e| ProvisionError::SchemaValidationFailed(e.to_string()))?;

    app.output.success(&format!(
        "{} is valid ({} {})",
        args.file.display(),
        secrets.len(),
        if secrets.len() == 1 { "registry" } else { "registries" }
    ));
    for registry in secrets.keys() {
        app.output.kv("registry", registry);
    }
    Ok(())
}
