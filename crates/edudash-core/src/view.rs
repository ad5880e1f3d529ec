// ── Report views ──
//
// One `ReportView` per analytics screen. A view owns its load state and
// publishes it through a `watch` channel. Each load bumps a generation
// counter and cancels the previous request, so a slow response for an
// old date range can never overwrite a newer one. The staleness check and
// the publish happen under the same lock that a new load takes to claim
// the slot. Cancelling restores what the view showed before the load;
// dropping the view cancels whatever is still in flight.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use edudash_api::{AnalyticsQuery, GroupBy};

use crate::date_range::DateRange;
use crate::error::CoreError;
use crate::model::ReportKind;

type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, CoreError>> + Send>>;
type Fetcher<T> = Box<dyn Fn(ReportRequest) -> BoxFuture<T> + Send + Sync>;

// ── ReportRequest ────────────────────────────────────────────────

/// The user-controlled inputs of one analytics request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    pub range: DateRange,
    pub group_by: Option<GroupBy>,
    pub limit: Option<u32>,
}

impl ReportRequest {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            group_by: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_query(&self) -> AnalyticsQuery {
        let mut query = self.range.to_query();
        query.group_by = self.group_by;
        query.limit = self.limit;
        query
    }
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self::new(DateRange::default_now())
    }
}

// ── ViewState ────────────────────────────────────────────────────

/// What a view currently shows.
#[derive(Debug)]
pub enum ViewState<T> {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight; render a placeholder.
    Loading,
    Ready(Arc<T>),
    /// The last request failed; `message` is shown with a retry action.
    Failed { message: String },
}

impl<T> Clone for ViewState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Ready(data) => Self::Ready(Arc::clone(data)),
            Self::Failed { message } => Self::Failed {
                message: message.clone(),
            },
        }
    }
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&Arc<T>> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }
}

// ── ReportView ───────────────────────────────────────────────────

/// The load currently owning a view.
struct InFlight<T> {
    generation: u64,
    token: CancellationToken,
    /// State shown before the first of a chain of superseding loads.
    restore: ViewState<T>,
}

/// Load state for one analytics screen.
pub struct ReportView<T> {
    kind: ReportKind,
    fetcher: Fetcher<T>,
    state: watch::Sender<ViewState<T>>,
    generation: AtomicU64,
    in_flight: Mutex<Option<InFlight<T>>>,
    last_request: Mutex<Option<ReportRequest>>,
}

impl<T: Send + Sync + 'static> ReportView<T> {
    /// Build a view around a fetch function. Nothing is requested until
    /// [`load`](Self::load) is called.
    pub fn new<F, Fut>(kind: ReportKind, fetch: F) -> Self
    where
        F: Fn(ReportRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            kind,
            fetcher: Box::new(move |request| Box::pin(fetch(request))),
            state,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
            last_request: Mutex::new(None),
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ViewState<T> {
        self.state.borrow().clone()
    }

    /// Number of loads issued so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Fetch `request`, superseding any load still in flight.
    ///
    /// Returns [`CoreError::Superseded`] when a newer load (or drop)
    /// cancelled this one; the published state then belongs to the newer
    /// load and is left untouched.
    pub async fn load(&self, request: ReportRequest) -> Result<Arc<T>, CoreError> {
        let (generation, token) = {
            let mut slot = lock(&self.in_flight);
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            let token = CancellationToken::new();
            let restore = match slot.take() {
                Some(previous) => {
                    previous.token.cancel();
                    previous.restore
                }
                None => self.state.borrow().clone(),
            };
            *slot = Some(InFlight {
                generation,
                token: token.clone(),
                restore,
            });
            *lock(&self.last_request) = Some(request);
            self.state.send_replace(ViewState::Loading);
            (generation, token)
        };
        debug!(view = %self.kind, generation, "loading");

        let result = tokio::select! {
            () = token.cancelled() => {
                debug!(view = %self.kind, generation, "request cancelled");
                return Err(CoreError::Superseded);
            }
            result = (self.fetcher)(request) => result,
        };

        let mut slot = lock(&self.in_flight);
        if slot.as_ref().map(|flight| flight.generation) != Some(generation) {
            warn!(view = %self.kind, generation, "discarding stale response");
            return Err(CoreError::Superseded);
        }
        *slot = None;

        match result {
            Ok(data) => {
                let data = Arc::new(data);
                self.state.send_replace(ViewState::Ready(Arc::clone(&data)));
                Ok(data)
            }
            Err(err) => {
                let message = format!("failed to fetch {}: {err}", self.kind);
                warn!(view = %self.kind, error = %err, "load failed");
                self.state.send_replace(ViewState::Failed { message });
                Err(err)
            }
        }
    }

    /// Re-issue the last request. A view that never loaded starts from the
    /// default date range.
    pub async fn retry(&self) -> Result<Arc<T>, CoreError> {
        let request = lock(&self.last_request).unwrap_or_default();
        self.load(request).await
    }

    /// Cancel the in-flight request, if any, and go back to the state
    /// shown before it started.
    pub fn cancel(&self) {
        let mut slot = lock(&self.in_flight);
        if let Some(flight) = slot.take() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            flight.token.cancel();
            self.state.send_replace(flight.restore);
        }
    }
}

impl<T> Drop for ReportView<T> {
    fn drop(&mut self) {
        let slot = self
            .in_flight
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(flight) = slot.take() {
            flight.token.cancel();
        }
    }
}

fn lock<V>(mutex: &Mutex<V>) -> std::sync::MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::NaiveDate;

    fn range(day: u32) -> DateRange {
        DateRange::default_for(NaiveDate::from_ymd_opt(2024, 5, day).unwrap())
    }

    /// Echoes the end date back after a delay chosen per request.
    fn echo_view() -> ReportView<String> {
        ReportView::new(ReportKind::Visits, |req: ReportRequest| async move {
            let delay = if req.range.end().format("%d").to_string() == "01" {
                200
            } else {
                10
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(req.range.end_param())
        })
    }

    #[tokio::test(start_paused = true)]
    async fn newer_load_wins_over_slow_older_one() {
        let view = echo_view();

        let (slow, fast) = tokio::join!(view.load(ReportRequest::new(range(1))), async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            view.load(ReportRequest::new(range(2))).await
        });

        assert!(matches!(slow, Err(CoreError::Superseded)));
        assert_eq!(fast.unwrap().as_str(), "2024-05-02");
        let state = view.state();
        assert_eq!(state.data().unwrap().as_str(), "2024-05-02");
        assert_eq!(view.generation(), 2);
    }

    #[tokio::test]
    async fn failure_is_published_with_view_name() {
        let view: ReportView<u32> = ReportView::new(ReportKind::Payments, |_| async {
            Err(CoreError::Api {
                message: "aggregation failed".into(),
                status: Some(500),
            })
        });

        assert!(view.load(ReportRequest::new(range(3))).await.is_err());
        match view.state() {
            ViewState::Failed { message } => {
                assert_eq!(message, "failed to fetch payments: API error: aggregation failed");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn retry_reissues_last_request() {
        let view = echo_view();
        view.load(ReportRequest::new(range(9))).await.unwrap();
        let again = view.retry().await.unwrap();
        assert_eq!(again.as_str(), "2024-05-09");
        assert_eq!(view.generation(), 2);
    }

    #[tokio::test]
    async fn subscribers_see_loading_then_ready() {
        let view = echo_view();
        let mut rx = view.subscribe();
        assert!(matches!(*rx.borrow(), ViewState::Idle));

        view.load(ReportRequest::new(range(4))).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().data().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_in_flight_request() {
        let view = Arc::new(echo_view());
        let loader = Arc::clone(&view);
        let handle = tokio::spawn(async move { loader.load(ReportRequest::new(range(1))).await });

        tokio::time::sleep(Duration::from_millis(5)).await;
        view.cancel();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(CoreError::Superseded)));
        assert!(matches!(view.state(), ViewState::Idle));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!view.state().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_restores_previous_data() {
        let view = Arc::new(echo_view());
        view.load(ReportRequest::new(range(9))).await.unwrap();

        let loader = Arc::clone(&view);
        let handle = tokio::spawn(async move { loader.load(ReportRequest::new(range(1))).await });
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(view.state().is_loading());

        view.cancel();
        assert!(matches!(handle.await.unwrap(), Err(CoreError::Superseded)));
        assert_eq!(view.state().data().unwrap().as_str(), "2024-05-09");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_supersede_targets_newest_load() {
        let view = Arc::new(echo_view());
        let first = Arc::clone(&view);
        let a = tokio::spawn(async move { first.load(ReportRequest::new(range(1))).await });
        tokio::time::sleep(Duration::from_millis(5)).await;

        // Both requests take 200ms; the second replaces the first.
        let second = Arc::clone(&view);
        let b = tokio::spawn(async move {
            second
                .load(ReportRequest::new(DateRange::default_for(
                    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                )))
                .await
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(matches!(a.await.unwrap(), Err(CoreError::Superseded)));

        view.cancel();
        assert!(matches!(b.await.unwrap(), Err(CoreError::Superseded)));
        assert!(matches!(view.state(), ViewState::Idle));
        assert_eq!(view.generation(), 3);
    }

    #[test]
    fn request_builds_query() {
        let req = ReportRequest::new(range(15)).group_by(GroupBy::Month).limit(6);
        let params = req.to_query().to_params();
        assert!(params.contains(&("groupBy", "month".to_owned())));
        assert!(params.contains(&("limit", "6".to_owned())));
    }
}
