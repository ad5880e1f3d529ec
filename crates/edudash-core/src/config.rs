// ── Runtime dashboard configuration ──
//
// Describes *how* to reach the backend and how to present what comes
// back. Carries credentials and tuning but never touches disk; the CLI
// resolves a profile and hands a `DashboardConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use edudash_api::{TlsMode, TransportConfig};

use crate::convert::Presentation;
use crate::currency::{CurrencyFormatter, DEFAULT_CURRENCY, DEFAULT_LOCALE};

/// Base API URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Admin login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (staging backends with self-signed certs).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Everything the [`Dashboard`](crate::Dashboard) needs for one session.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// API root, e.g. `https://edu.example.com/api`.
    pub url: Url,
    /// `None` when the caller only needs offline helpers.
    pub credentials: Option<Credentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    pub currency: CurrencyFormatter,
    pub presentation: Presentation,
}

impl DashboardConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: edudash_api::DEFAULT_TIMEOUT,
            currency: CurrencyFormatter::new(DEFAULT_CURRENCY, DEFAULT_LOCALE),
            presentation: Presentation::default(),
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, email: impl Into<String>, password: SecretString) -> Self {
        self.credentials = Some(Credentials {
            email: email.into(),
            password,
        });
        self
    }

    /// Transport settings for the HTTP client, with a fresh cookie jar.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_session_jar()
    }
}
