//! Infrastructure implementation of the `LoginFlow` port.

use anyhow::{Context, Result};
use dialoguer::Password;

use crate::application::ports::{ConfigStore, FleetBackend, LoginFlow, ProgressReporter};
use crate::application::services::login::store_token;

/// Asks for an API token on the terminal (or takes a preset one) and stores it.
pub struct TokenLogin<'a, B, C, P> {
    backend: &'a B,
    store: &'a C,
    reporter: &'a P,
    preset: Option<String>,
    non_interactive: bool,
}

impl<'a, B, C, P> TokenLogin<'a, B, C, P>
where
    B: FleetBackend,
    C: ConfigStore,
    P: ProgressReporter,
{
    #[must_use]
    pub fn new(backend: &'a B, store: &'a C, reporter: &'a P, non_interactive: bool) -> Self {
        Self {
            backend,
            store,
            reporter,
            preset: None,
            non_interactive,
        }
    }

    /// Use `token` instead of prompting.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.preset = token;
        self
    }

    fn read_token(&self) -> Result<String> {
        if let Some(token) = &self.preset {
            return Ok(token.clone());
        }
        anyhow::ensure!(
            !self.non_interactive,
            "not logged in; run `fleetjoin login --token <TOKEN>` first"
        );
        Password::new()
            .with_prompt("API token")
            .interact()
            .context("reading API token")
    }
}

impl<B, C, P> LoginFlow for TokenLogin<'_, B, C, P>
where
    B: FleetBackend,
    C: ConfigStore,
    P: ProgressReporter,
{
    async fn login(&self) -> Result<()> {
        if self.preset.is_none() {
            self.reporter.step("Looks like you're not logged in yet!");
        }
        let token = self.read_token()?;
        store_token(self.backend, self.store, self.reporter, &token).await?;
        Ok(())
    }
}
