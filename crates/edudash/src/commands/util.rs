//! Shared helpers for command handlers.

use edudash_core::Dashboard;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

/// Resolve the config, build the client and log in.
///
/// The session cookie lives only as long as this process, so every
/// backend command logs in first.
pub async fn connect(global: &GlobalOpts) -> Result<Dashboard, CliError> {
    let (dash_config, profile) = config::resolve_dashboard_config(global)?;
    if dash_config.credentials.is_none() {
        return Err(CliError::NoCredentials { profile });
    }

    let dashboard = Dashboard::new(dash_config)?;
    let sp = output::spinner("Logging in", global.quiet);
    let result = dashboard.login().await;
    sp.finish_and_clear();

    result.map_err(|e| match CliError::from(e) {
        CliError::AuthFailed { message, .. } => CliError::AuthFailed { message, profile },
        other => other,
    })?;
    Ok(dashboard)
}
