//! Login command handler.

use aerogarden_core::{ControllerConfig, validate_credentials};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Single login attempt; succeeds iff the service hands out a user id.
pub async fn handle(config: ControllerConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let username = config.username.clone();
    let host = config.host.clone();
    validate_credentials(config).await?;

    if !global.quiet {
        eprintln!("✓ Logged in as {username} at {host}");
    }
    Ok(())
}
