//! Application service: adopt and persist an API token.

use anyhow::{Context, Result};

use crate::application::ports::{ConfigStore, FleetBackend, ProgressReporter};

/// Verify `token` against the backend and store it in the config file.
///
/// Returns the username the token belongs to.
///
/// # Errors
///
/// Returns [`crate::domain::error::ProvisionError::NotAuthenticated`] if the
/// token is rejected, or an error if the config file cannot be written.
pub async fn store_token(
    backend: &impl FleetBackend,
    store: &impl ConfigStore,
    reporter: &impl ProgressReporter,
    token: &str,
) -> Result<String> {
    let token = token.trim();
    anyhow::ensure!(!token.is_empty(), "the API token cannot be empty");

    let username = backend.authenticate(token).await?;
    let mut config = store.load()?;
    config.api.token = Some(token.to_string());
    store.save(&config).context("saving API token")?;

    tracing::debug!(username, "token stored");
    reporter.success(&format!("Successfully logged in as '{username}'"));
    Ok(username)
}
