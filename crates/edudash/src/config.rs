//! CLI configuration — thin wrapper around `edudash_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --email, --insecure, --timeout) on top of the profile.

use std::io::IsTerminal;
use std::time::Duration;

use secrecy::SecretString;

use edudash_core::{DashboardConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use edudash_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for diagnostics.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build a `DashboardConfig` from the config file, profile and flags.
///
/// Returns the profile name alongside for diagnostics. An explicitly
/// requested profile must exist; otherwise a missing profile falls back
/// to defaults so flags and env vars alone are enough.
pub fn resolve_dashboard_config(
    global: &GlobalOpts,
) -> Result<(DashboardConfig, String), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => Profile::default(),
    };

    // Flag > env > profile
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(ref email) = global.email {
        profile.email = Some(email.clone());
    }

    let mut config =
        edudash_config::profile_to_dashboard_config(&profile, &profile_name, &cfg.defaults)?;

    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }

    if config.credentials.is_none() {
        if let Some((email, password)) = prompt_password_if_interactive(&profile, &profile_name)? {
            config = config.with_credentials(email, password);
        }
    }

    Ok((config, profile_name))
}

/// Ask for the password when an email is known but no stored password
/// resolved and stdin is a terminal.
fn prompt_password_if_interactive(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<(String, SecretString)>, CliError> {
    let Ok(email) = edudash_config::resolve_email(profile, profile_name) else {
        return Ok(None);
    };
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }
    let password = rpassword::prompt_password(format!("Password for {email}: "))?;
    if password.is_empty() {
        return Ok(None);
    }
    Ok(Some((email, SecretString::from(password))))
}
