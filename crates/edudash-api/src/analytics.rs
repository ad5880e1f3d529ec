// Analytics endpoints
//
// Server-aggregated statistics under `admin/statistics/`. Grouping,
// summing and ranking happen server-side; these calls only fetch and
// decode the payloads.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    ContentPayload, FavoritesPayload, OverviewPayload, PaymentsPayload, UsersPayload,
    VisitsPayload,
};
use crate::query::AnalyticsQuery;

impl ApiClient {
    /// Headline counters for the summary cards.
    ///
    /// `GET admin/statistics/overview`
    pub async fn get_overview(&self, query: &AnalyticsQuery) -> Result<OverviewPayload, Error> {
        debug!(start = %query.start_date, end = %query.end_date, "fetching overview");
        self.get_data("admin/statistics/overview", &query.to_params())
            .await
    }

    /// Visit time series, top pages and device breakdown.
    ///
    /// `GET admin/statistics/visits`
    pub async fn get_visit_stats(&self, query: &AnalyticsQuery) -> Result<VisitsPayload, Error> {
        debug!(group_by = ?query.group_by, "fetching visit stats");
        self.get_data("admin/statistics/visits", &query.to_params())
            .await
    }

    /// Most-viewed courses/programs and the category breakdown.
    ///
    /// `GET admin/statistics/content`
    pub async fn get_content_stats(&self, query: &AnalyticsQuery) -> Result<ContentPayload, Error> {
        debug!(kind = ?query.kind, limit = ?query.limit, "fetching content stats");
        self.get_data("admin/statistics/content", &query.to_params())
            .await
    }

    /// Registrations, role breakdown and most active users.
    ///
    /// `GET admin/statistics/users`
    pub async fn get_user_stats(&self, query: &AnalyticsQuery) -> Result<UsersPayload, Error> {
        debug!(group_by = ?query.group_by, "fetching user stats");
        self.get_data("admin/statistics/users", &query.to_params())
            .await
    }

    /// Payment status breakdown and revenue series.
    ///
    /// `GET admin/statistics/payments`
    pub async fn get_payment_stats(&self, query: &AnalyticsQuery) -> Result<PaymentsPayload, Error> {
        debug!(group_by = ?query.group_by, page = ?query.page, "fetching payment stats");
        self.get_data("admin/statistics/payments", &query.to_params())
            .await
    }

    /// Most-favorited courses and programs.
    ///
    /// `GET admin/statistics/favorites`
    pub async fn get_favorite_stats(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<FavoritesPayload, Error> {
        debug!(limit = ?query.limit, "fetching favorite stats");
        self.get_data("admin/statistics/favorites", &query.to_params())
            .await
    }
}
