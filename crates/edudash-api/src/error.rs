use thiserror::Error;

/// Top-level error type for the `edudash-api` crate.
///
/// Covers every failure mode of the admin REST surface: authentication,
/// transport, HTTP status, envelope decoding, and asset uploads.
/// `edudash-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, disabled account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session cookie missing, expired or revoked (HTTP 401 on a data call).
    #[error("Session expired -- log in again")]
    SessionExpired,

    /// The session is valid but lacks the admin role (HTTP 403).
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP status ─────────────────────────────────────────────────
    /// HTTP 404 for the requested path.
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Any other non-success status. `message` comes from the body's
    /// `message`/`error` field when the backend provides one.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Upload ──────────────────────────────────────────────────────
    /// A multipart part could not be built (bad MIME string, etc.)
    #[error("Upload of {asset} failed: {message}")]
    Upload { asset: String, message: String },
}

impl Error {
    /// Returns `true` if this error indicates the session is gone
    /// and logging in again might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error a manual retry may fix.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::NotFound { .. } => true,
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
