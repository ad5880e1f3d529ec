// HTTP client construction for the admin API.
//
// A `TransportConfig` carries how server certificates are checked, the
// per-request timeout, and the cookie jar that holds the admin session
// between `auth/login` and the analytics and record calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

use crate::error::Error;

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the backend's certificate is verified.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// System certificate store.
    System,
    /// Trust an extra CA from a PEM file (self-hosted deployments).
    CustomCa(PathBuf),
    /// Accept any certificate. Only for staging backends.
    DangerAcceptInvalid,
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    /// Session cookie store; `None` until [`with_session_jar`](Self::with_session_jar).
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: DEFAULT_TIMEOUT,
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// Attach a fresh cookie jar unless one is already set, so clones of
    /// a config that already holds a session keep sharing it.
    pub fn with_session_jar(mut self) -> Self {
        if self.cookie_jar.is_none() {
            self.cookie_jar = Some(Arc::new(Jar::default()));
        }
        self
    }

    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("edudash/", env!("CARGO_PKG_VERSION")));

        builder = match &self.tls {
            TlsMode::System => builder,
            TlsMode::CustomCa(path) => builder.add_root_certificate(load_ca(path)?),
            TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        if let Some(jar) = &self.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("cannot read CA file {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("invalid CA file {}: {e}", path.display())))
}
