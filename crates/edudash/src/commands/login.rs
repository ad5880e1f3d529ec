//! `login` — check credentials against the backend.

use edudash_core::SessionState;

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::util;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let dashboard = util::connect(global).await?;

    let state = dashboard.session_state().borrow().clone();
    if let SessionState::LoggedIn { email } = state {
        if !global.quiet {
            eprintln!("✓ Logged in to {} as {email}", dashboard.config().url);
        }
    }

    dashboard.logout().await;
    Ok(())
}
