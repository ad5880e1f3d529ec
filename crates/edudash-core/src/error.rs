// ── Core error types ──
//
// User-facing errors from edudash-core. Consumers never see reqwest
// errors or raw JSON failures; `From<edudash_api::Error>` translates the
// transport layer into these variants.

use thiserror::Error;

use crate::upload::AssetRejection;
use crate::validation::ValidationErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- log in again")]
    SessionExpired,

    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Not logged in")]
    NotConnected,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    // ── Submission errors ────────────────────────────────────────────
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    AssetRejected(AssetRejection),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ── Request lifecycle ────────────────────────────────────────────
    /// A newer request for the same view replaced this one.
    #[error("Request superseded")]
    Superseded,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether logging in again could resolve this error.
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            Self::SessionExpired | Self::NotConnected | Self::AuthenticationFailed { .. }
        )
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<AssetRejection> for CoreError {
    fn from(rejection: AssetRejection) -> Self {
        Self::AssetRejected(rejection)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<edudash_api::Error> for CoreError {
    fn from(err: edudash_api::Error) -> Self {
        use edudash_api::Error as Api;

        match err {
            Api::Authentication { message } => CoreError::AuthenticationFailed { message },
            Api::SessionExpired => CoreError::SessionExpired,
            Api::Forbidden { message } => CoreError::Forbidden { message },
            Api::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            Api::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            Api::NotFound { path } => CoreError::NotFound { path },
            Api::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            Api::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unreadable response: {message}"))
            }
            Api::Upload { asset, message } => CoreError::Api {
                message: format!("{asset} upload failed: {message}"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_errors_map_to_domain_variants() {
        let err = CoreError::from(edudash_api::Error::SessionExpired);
        assert!(err.needs_login());

        let err = CoreError::from(edudash_api::Error::NotFound {
            path: "/api/admin/courses/9".into(),
        });
        assert!(matches!(err, CoreError::NotFound { ref path } if path.ends_with("/9")));

        let err = CoreError::from(edudash_api::Error::Api {
            status: 502,
            message: "bad gateway".into(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(502), .. }));
        assert_eq!(err.to_string(), "API error: bad gateway");
    }

    #[test]
    fn deserialization_hides_the_raw_body() {
        let err = CoreError::from(edudash_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>secret</html>".into(),
        });
        assert!(!err.to_string().contains("secret"));
    }
}
