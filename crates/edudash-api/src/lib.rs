// edudash-api: Async Rust client for the education platform's admin REST API

pub mod analytics;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod records;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use query::{AnalyticsQuery, GroupBy};
pub use records::{AssetSlot, RecordKind, UploadPart};
pub use transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};
