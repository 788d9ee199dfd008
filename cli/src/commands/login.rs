//! `fleetjoin login`: store an API token.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::LoginFlow;
use crate::infra::login::TokenLogin;

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// API token; prompted for when omitted
    #[arg(long, env = "FLEETJOIN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Run the login command.
///
/// # Errors
///
/// Returns an error if the token is rejected or cannot be saved.
pub async fn run(app: &AppContext, args: &LoginArgs) -> Result<()> {
    let backend = app.backend()?;
    let reporter = app.reporter();
    TokenLogin::new(&backend, &app.config_store, &reporter, app.non_interactive)
        .with_token(args.token.clone())
        .login()
        .await
}
