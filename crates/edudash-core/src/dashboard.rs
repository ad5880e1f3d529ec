// ── Dashboard facade ──
//
// Session lifecycle plus one fetch method per analytics view. Each fetch
// sends the date range and grouping, converts the raw payload into its
// report, and resolves media paths against the API origin. Record saves
// validate locally, update the record, then upload assets one by one.

use std::sync::Arc;

use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use edudash_api::{ApiClient, RecordKind};

use crate::config::DashboardConfig;
use crate::convert::{self, Presentation};
use crate::currency::CurrencyFormatter;
use crate::error::CoreError;
use crate::model::{
    ContentReport, FavoritesReport, OverviewReport, PaymentReport, RankedEntry, ReportKind,
    UserReport, VisitReport,
};
use crate::upload::{AssetFile, precheck};
use crate::validation::RecordForm;
use crate::view::{ReportRequest, ReportView};

// ── SessionState ─────────────────────────────────────────────────

/// Login state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggingIn,
    LoggedIn { email: String },
    Failed,
}

// ── SaveOutcome ──────────────────────────────────────────────────

/// One asset that could not be uploaded after the record was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetFailure {
    pub kind: String,
    pub file_name: String,
    pub message: String,
}

/// Result of [`Dashboard::save_record`].
///
/// The record update either succeeded (this value exists) or the whole
/// save failed with an error. Asset uploads are independent: a failed
/// upload never rolls the record back and is listed in `failed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveOutcome {
    pub kind: String,
    pub id: String,
    /// The backend's echo of the saved record.
    pub record: Value,
    pub uploaded: Vec<String>,
    pub failed: Vec<AssetFailure>,
}

impl SaveOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// One-line summary suitable for a status line.
    pub fn message(&self) -> String {
        let subject = capitalize(&self.kind);
        if self.failed.is_empty() {
            return format!("{subject} {} saved", self.id);
        }
        let failed: Vec<String> = self
            .failed
            .iter()
            .map(|f| format!("{} ({})", f.kind, f.message))
            .collect();
        format!(
            "{subject} {} saved, but upload failed for {} (partial success)",
            self.id,
            failed.join(", ")
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

// ── Dashboard ────────────────────────────────────────────────────

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<DashboardInner>`; views hold a clone so
/// they can fetch on their own.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    api: ApiClient,
    session: watch::Sender<SessionState>,
}

impl Dashboard {
    /// Build the HTTP client from `config`. Does not log in.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.url.clone(), &config.transport())?;
        Ok(Self::with_api(config, api))
    }

    /// Wrap an existing API client (tests, shared clients).
    pub fn with_api(config: DashboardConfig, api: ApiClient) -> Self {
        let (session, _) = watch::channel(SessionState::LoggedOut);
        Self {
            inner: Arc::new(DashboardInner {
                config,
                api,
                session,
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn currency(&self) -> &CurrencyFormatter {
        &self.inner.config.currency
    }

    pub fn presentation(&self) -> Presentation {
        self.inner.config.presentation
    }

    pub fn session_state(&self) -> watch::Receiver<SessionState> {
        self.inner.session.subscribe()
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// Log in with the configured credentials.
    pub async fn login(&self) -> Result<(), CoreError> {
        let Some(creds) = self.inner.config.credentials.as_ref() else {
            return Err(CoreError::Config {
                message: "no admin email/password configured".into(),
            });
        };
        self.login_with(&creds.email, &creds.password).await
    }

    /// Log in with explicit credentials. The session cookie is kept in the
    /// client's jar for every later request.
    pub async fn login_with(&self, email: &str, password: &SecretString) -> Result<(), CoreError> {
        self.inner.session.send_replace(SessionState::LoggingIn);
        match self.inner.api.login(email, password).await {
            Ok(()) => {
                info!(email, "logged in");
                self.inner.session.send_replace(SessionState::LoggedIn {
                    email: email.to_owned(),
                });
                Ok(())
            }
            Err(e) => {
                self.inner.session.send_replace(SessionState::Failed);
                Err(self.map_err(e))
            }
        }
    }

    /// End the session. Errors are logged, never returned.
    pub async fn logout(&self) {
        if let Err(e) = self.inner.api.logout().await {
            debug!(error = %e, "logout request failed");
        }
        self.inner.session.send_replace(SessionState::LoggedOut);
        info!("logged out");
    }

    /// Fill in the configured timeout, which reqwest does not report.
    fn map_err(&self, err: edudash_api::Error) -> CoreError {
        match CoreError::from(err) {
            CoreError::Timeout { timeout_secs: 0 } => CoreError::Timeout {
                timeout_secs: self.inner.config.timeout.as_secs(),
            },
            other => other,
        }
    }

    // ── Analytics ────────────────────────────────────────────────

    fn request_query(&self, request: &ReportRequest) -> edudash_api::AnalyticsQuery {
        let mut query = request.to_query();
        if query.limit.is_none() {
            query.limit = u32::try_from(self.presentation().top_n).ok();
        }
        query
    }

    /// The request's limit, when given, overrides the configured top-N.
    fn presentation_for(&self, request: &ReportRequest) -> Presentation {
        let mut view = self.presentation();
        if let Some(limit) = request.limit.and_then(|l| usize::try_from(l).ok()) {
            view.top_n = limit;
        }
        view
    }

    pub async fn overview(&self, request: &ReportRequest) -> Result<OverviewReport, CoreError> {
        let raw = self
            .inner
            .api
            .get_overview(&request.to_query())
            .await
            .map_err(|e| self.map_err(e))?;
        Ok(OverviewReport::from(&raw))
    }

    pub async fn visits(&self, request: &ReportRequest) -> Result<VisitReport, CoreError> {
        let raw = self
            .inner
            .api
            .get_visit_stats(&self.request_query(request))
            .await
            .map_err(|e| self.map_err(e))?;
        Ok(convert::visit_report(&raw, self.presentation_for(request)))
    }

    pub async fn content(&self, request: &ReportRequest) -> Result<ContentReport, CoreError> {
        let raw = self
            .inner
            .api
            .get_content_stats(&self.request_query(request))
            .await
            .map_err(|e| self.map_err(e))?;
        let mut report = convert::content_report(&raw, self.presentation_for(request));
        self.resolve_media(&mut report.top_courses);
        self.resolve_media(&mut report.top_programs);
        Ok(report)
    }

    pub async fn users(&self, request: &ReportRequest) -> Result<UserReport, CoreError> {
        let raw = self
            .inner
            .api
            .get_user_stats(&self.request_query(request))
            .await
            .map_err(|e| self.map_err(e))?;
        Ok(convert::user_report(&raw, self.presentation_for(request)))
    }

    pub async fn payments(&self, request: &ReportRequest) -> Result<PaymentReport, CoreError> {
        let raw = self
            .inner
            .api
            .get_payment_stats(&request.to_query())
            .await
            .map_err(|e| self.map_err(e))?;
        Ok(PaymentReport::from(&raw))
    }

    pub async fn favorites(&self, request: &ReportRequest) -> Result<FavoritesReport, CoreError> {
        let raw = self
            .inner
            .api
            .get_favorite_stats(&self.request_query(request))
            .await
            .map_err(|e| self.map_err(e))?;
        let mut report = convert::favorites_report(&raw, self.presentation_for(request));
        self.resolve_media(&mut report.top_courses);
        self.resolve_media(&mut report.top_programs);
        Ok(report)
    }

    /// Formatter for a payment report: the backend's currency wins over
    /// the configured one.
    pub fn currency_for(&self, report: &PaymentReport) -> CurrencyFormatter {
        match report.currency.as_deref() {
            Some(code) => self.currency().with_code(code),
            None => self.currency().clone(),
        }
    }

    fn resolve_media(&self, entries: &mut [RankedEntry]) {
        for entry in entries {
            entry.thumbnail_url = entry
                .thumbnail_url
                .as_deref()
                .and_then(|raw| self.inner.api.media_url(raw))
                .map(String::from);
        }
    }

    // ── Views ────────────────────────────────────────────────────

    pub fn overview_view(&self) -> ReportView<OverviewReport> {
        let this = self.clone();
        ReportView::new(ReportKind::Overview, move |req| {
            let this = this.clone();
            async move { this.overview(&req).await }
        })
    }

    pub fn visits_view(&self) -> ReportView<VisitReport> {
        let this = self.clone();
        ReportView::new(ReportKind::Visits, move |req| {
            let this = this.clone();
            async move { this.visits(&req).await }
        })
    }

    pub fn content_view(&self) -> ReportView<ContentReport> {
        let this = self.clone();
        ReportView::new(ReportKind::Content, move |req| {
            let this = this.clone();
            async move { this.content(&req).await }
        })
    }

    pub fn users_view(&self) -> ReportView<UserReport> {
        let this = self.clone();
        ReportView::new(ReportKind::Users, move |req| {
            let this = this.clone();
            async move { this.users(&req).await }
        })
    }

    pub fn payments_view(&self) -> ReportView<PaymentReport> {
        let this = self.clone();
        ReportView::new(ReportKind::Payments, move |req| {
            let this = this.clone();
            async move { this.payments(&req).await }
        })
    }

    pub fn favorites_view(&self) -> ReportView<FavoritesReport> {
        let this = self.clone();
        ReportView::new(ReportKind::Favorites, move |req| {
            let this = this.clone();
            async move { this.favorites(&req).await }
        })
    }

    // ── Records ──────────────────────────────────────────────────

    /// Validate and save a course or program, then upload its assets.
    ///
    /// Form validation and asset prechecks run before any request; either
    /// failing aborts the save. A failed record update is an error. Each
    /// asset upload after that succeeds or fails on its own and is
    /// reported in the [`SaveOutcome`].
    pub async fn save_record(
        &self,
        kind: RecordKind,
        id: &str,
        form: &RecordForm,
        assets: &[AssetFile],
    ) -> Result<SaveOutcome, CoreError> {
        let body = form.to_update_body()?;
        for asset in assets {
            precheck(asset)?;
        }

        let record = self
            .inner
            .api
            .update_record(kind, id, &body)
            .await
            .map_err(|e| self.map_err(e))?;
        info!(%kind, id, "record updated");

        let mut outcome = SaveOutcome {
            kind: kind.to_string(),
            id: id.to_owned(),
            record,
            uploaded: Vec::new(),
            failed: Vec::new(),
        };

        for asset in assets {
            match self.upload_one(kind, id, asset).await {
                Ok(()) => outcome.uploaded.push(asset.kind.to_string()),
                Err(e) => {
                    warn!(%kind, id, asset = %asset.kind, error = %e, "asset upload failed");
                    outcome.failed.push(AssetFailure {
                        kind: asset.kind.to_string(),
                        file_name: asset.file_name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(outcome)
    }

    async fn upload_one(
        &self,
        kind: RecordKind,
        id: &str,
        asset: &AssetFile,
    ) -> Result<(), CoreError> {
        let part = asset.read_part().await?;
        self.inner
            .api
            .upload_asset(kind, id, asset.kind, part)
            .await
            .map_err(|e| self.map_err(e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome(failed: Vec<AssetFailure>) -> SaveOutcome {
        SaveOutcome {
            kind: "course".into(),
            id: "42".into(),
            record: json!({}),
            uploaded: vec!["image".into()],
            failed,
        }
    }

    #[test]
    fn complete_save_message() {
        let o = outcome(Vec::new());
        assert!(o.is_complete());
        assert_eq!(o.message(), "Course 42 saved");
    }

    #[test]
    fn partial_save_names_failed_assets() {
        let o = outcome(vec![AssetFailure {
            kind: "video".into(),
            file_name: "intro.mp4".into(),
            message: "API error: file too large".into(),
        }]);
        assert!(!o.is_complete());
        assert_eq!(
            o.message(),
            "Course 42 saved, but upload failed for video (API error: file too large) (partial success)"
        );
    }
}
