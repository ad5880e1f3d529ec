//! Analytics adapter layer between `edudash-api` and the dashboard UI.
//!
//! The backend's statistics endpoints return loosely typed aggregates:
//! counts as strings, missing titles, nulls where numbers belong. This
//! crate turns them into render-ready shapes and owns the request
//! lifecycle around them:
//!
//! - **Adapters** ([`coerce`], [`label`], [`percent`], [`ranking`],
//!   [`date_range`], [`currency`]) — pure, stateless helpers. Malformed
//!   input degrades to a safe default instead of failing.
//!
//! - **[`Dashboard`]** — Facade over the API client: login/logout, one
//!   fetch per analytics view, and [`save_record()`](Dashboard::save_record)
//!   which validates, updates, and uploads assets with partial-success
//!   reporting.
//!
//! - **[`ReportView<T>`]** — Per-view load state published through a
//!   `tokio::sync::watch` channel. A newer load cancels and supersedes an
//!   older one, so stale responses never reach the screen.
//!
//! - **Domain model** ([`model`]) — `MetricPoint`, `RankedEntry`,
//!   `Distribution` and one report type per view.

pub mod coerce;
pub mod config;
pub mod convert;
pub mod currency;
pub mod dashboard;
pub mod date_range;
pub mod error;
pub mod label;
pub mod model;
pub mod percent;
pub mod ranking;
pub mod upload;
pub mod validation;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Credentials, DEFAULT_API_URL, DashboardConfig, TlsVerification};
pub use convert::Presentation;
pub use currency::CurrencyFormatter;
pub use dashboard::{AssetFailure, Dashboard, SaveOutcome, SessionState};
pub use date_range::DateRange;
pub use error::CoreError;
pub use label::{EntityKind, LabelPolicy};
pub use upload::{AssetFile, AssetKind};
pub use validation::{FieldError, RecordForm, ValidationErrors};
pub use view::{ReportRequest, ReportView, ViewState};

pub use model::{
    ContentReport, Distribution, DistributionSlice, FavoritesReport, MetricPoint, OverviewReport,
    PaymentReport, RankedEntry, ReportKind, UserReport, VisitReport,
};

// API types consumers need without depending on `edudash-api` directly.
pub use edudash_api::{GroupBy, RecordKind};
