//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use edudash_config::ConfigError;
use edudash_core::CoreError;

/// Process exit codes. Success exits with 0.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the API at {url}")]
    #[diagnostic(
        code(edudash::connection_failed),
        help(
            "Check that the backend is running and the URL is right.\n\
             Reason: {reason}\n\
             Override with --api-url or EDUDASH_API_URL."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(edudash::auth_failed),
        help(
            "Verify the admin email and password.\n\
             Run: edudash config set-password --profile {profile}"
        )
    )]
    AuthFailed { message: String, profile: String },

    #[error("Session expired")]
    #[diagnostic(code(edudash::session_expired), help("Run the command again to log in."))]
    SessionExpired,

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(edudash::forbidden),
        help("The account needs the admin role for this operation.")
    )]
    Forbidden { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(edudash::no_credentials),
        help(
            "Configure credentials with: edudash config init\n\
             Or set EDUDASH_EMAIL and EDUDASH_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {path}")]
    #[diagnostic(code(edudash::not_found), help("Check the record ID."))]
    NotFound { path: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(edudash::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(edudash::validation))]
    Validation { field: String, reason: String },

    #[error("Record not saved: {summary}")]
    #[diagnostic(
        code(edudash::invalid_record),
        help("Fix the listed fields; nothing was sent to the backend.")
    )]
    InvalidRecord { summary: String },

    #[error("{message}")]
    #[diagnostic(
        code(edudash::asset_rejected),
        help(
            "Images: jpeg, png, webp or gif up to 5 MiB.\n\
             Videos: mp4, webm or mov up to 500 MiB."
        )
    )]
    AssetRejected { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(edudash::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: edudash config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(edudash::config))]
    Config { message: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(edudash::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(edudash::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. }
            | Self::SessionExpired
            | Self::Forbidden { .. }
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::InvalidRecord { .. } | Self::AssetRejected { .. } => {
                exit_code::USAGE
            }
            Self::ApiError { .. } | Self::Config { .. } | Self::Io(_) | Self::Internal(_) => {
                exit_code::GENERAL
            }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                message,
                profile: "default".into(),
            },

            CoreError::SessionExpired | CoreError::NotConnected => CliError::SessionExpired,

            CoreError::Forbidden { message } => CliError::Forbidden { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotFound { path } => CliError::NotFound { path },

            CoreError::InvalidDateRange { start, end } => CliError::Validation {
                field: "from".into(),
                reason: format!("{start} is after {end}"),
            },

            CoreError::Validation(errors) => CliError::InvalidRecord {
                summary: errors.to_string(),
            },

            CoreError::AssetRejected(rejection) => CliError::AssetRejected {
                message: rejection.to_string(),
            },

            CoreError::Io { path, source } => CliError::Io(std::io::Error::new(
                source.kind(),
                format!("{path}: {source}"),
            )),

            CoreError::Api { message, status } => CliError::ApiError { status, message },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Superseded => CliError::Internal("request superseded".into()),

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_exit_with_three() {
        let err = CliError::from(CoreError::SessionExpired);
        assert_eq!(err.exit_code(), exit_code::AUTH);

        let err = CliError::from(ConfigError::NoCredentials {
            profile: "default".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn transport_errors_keep_their_codes() {
        let err = CliError::from(CoreError::Timeout { timeout_secs: 30 });
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
        assert_eq!(err.to_string(), "Request timed out after 30s");

        let err = CliError::from(CoreError::ConnectionFailed {
            url: "http://localhost:5000/api".into(),
            reason: "refused".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn api_error_shows_status_when_known() {
        let err = CliError::from(CoreError::Api {
            message: "db down".into(),
            status: Some(500),
        });
        assert_eq!(err.to_string(), "API error (500): db down");
        assert_eq!(err.exit_code(), exit_code::GENERAL);

        let err = CliError::ApiError {
            status: None,
            message: "bad body".into(),
        };
        assert_eq!(err.to_string(), "API error: bad body");
    }

    #[test]
    fn invalid_date_range_is_usage_error() {
        let err = CliError::from(CoreError::InvalidDateRange {
            start: "2024-06-01".into(),
            end: "2024-05-01".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
