//! Shared configuration for the edudash CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `edudash_core::DashboardConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use edudash_core::{
    CurrencyFormatter, DEFAULT_API_URL, DashboardConfig, LabelPolicy, Presentation,
    TlsVerification,
};

/// Service name for keyring entries.
pub const KEYRING_SERVICE: &str = "edudash";

/// Environment variable holding the admin email when the profile has none.
pub const EMAIL_ENV: &str = "EDUDASH_EMAIL";

/// Environment variable holding the admin password.
pub const PASSWORD_ENV: &str = "EDUDASH_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile named `name`, or the default profile when `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// ISO 4217 code amounts are shown in.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Locale for number grouping (`en`, `fr`, `de`, `ar`).
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Entries shown in ranked lists.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            currency: default_currency(),
            locale: default_locale(),
            top_n: default_top_n(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_currency() -> String {
    edudash_core::currency::DEFAULT_CURRENCY.into()
}
fn default_locale() -> String {
    edudash_core::currency::DEFAULT_LOCALE.into()
}
fn default_top_n() -> usize {
    edudash_core::ranking::DEFAULT_TOP_N
}

/// A named backend profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g., "https://edu.example.com/api").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Admin account email.
    pub email: Option<String>,

    /// Password (plaintext — prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override the display currency.
    pub currency: Option<String>,

    /// Override the number locale.
    pub locale: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override ranked list length.
    pub top_n: Option<usize>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            email: None,
            password: None,
            password_env: None,
            currency: None,
            locale: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            top_n: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "edudash", "edudash").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("edudash");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment.
///
/// Nested keys come from `EDUDASH_` variables with `__` as the separator
/// (`EDUDASH_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("EDUDASH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

/// The admin email: profile first, then `EDUDASH_EMAIL`.
pub fn resolve_email(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .email
        .clone()
        .filter(|e| !e.trim().is_empty())
        .or_else(|| std::env::var(EMAIL_ENV).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// The admin password from the credential chain (no CLI flag step).
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Build a `DashboardConfig` from a profile — no CLI flag overrides.
///
/// Credentials are attached when they resolve; a profile without them is
/// still usable for commands that never log in.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let mut config = DashboardConfig::new(url);

    if let (Ok(email), Ok(password)) = (
        resolve_email(profile, profile_name),
        resolve_password(profile, profile_name),
    ) {
        config = config.with_credentials(email, password);
    }

    config.tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    config.currency = CurrencyFormatter::new(
        profile.currency.as_deref().unwrap_or(&defaults.currency),
        profile.locale.as_deref().unwrap_or(&defaults.locale),
    );

    config.presentation = Presentation {
        top_n: profile.top_n.unwrap_or(defaults.top_n),
        labels: LabelPolicy::TABLE,
    };

    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.defaults.currency, "DZD");
        assert_eq!(cfg.defaults.top_n, 6);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "staging".into(),
            Profile {
                api_url: "https://staging.example.com/api".into(),
                email: Some("admin@example.com".into()),
                locale: Some("fr".into()),
                ..Profile::default()
            },
        );
        cfg.default_profile = Some("staging".into());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let (name, profile) = loaded.profile(None).unwrap();
        assert_eq!(name, "staging");
        assert_eq!(profile.api_url, "https://staging.example.com/api");
        assert_eq!(profile.locale.as_deref(), Some("fr"));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile(Some("prod")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn profile_overrides_defaults() {
        let profile = Profile {
            api_url: "https://edu.example.com/api".into(),
            currency: Some("eur".into()),
            locale: Some("de".into()),
            insecure: Some(true),
            timeout: Some(5),
            top_n: Some(10),
            ..Profile::default()
        };
        let cfg = profile_to_dashboard_config(&profile, "test", &Defaults::default()).unwrap();

        assert_eq!(cfg.url.as_str(), "https://edu.example.com/api");
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.currency.code(), "EUR");
        assert_eq!(cfg.currency.locale(), "de");
        assert_eq!(cfg.presentation.top_n, 10);
    }

    #[test]
    fn custom_ca_used_when_secure() {
        let profile = Profile {
            ca_cert: Some(PathBuf::from("/etc/ssl/edu-ca.pem")),
            ..Profile::default()
        };
        let cfg = profile_to_dashboard_config(&profile, "test", &Defaults::default()).unwrap();
        assert_eq!(
            cfg.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/ssl/edu-ca.pem"))
        );
    }

    #[test]
    fn invalid_url_is_rejected() {
        let profile = Profile {
            api_url: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_dashboard_config(&profile, "test", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
    }
}
