// ── Per-view analytics reports ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::metric::{Distribution, MetricPoint, RankedEntry};

/// The six analytics views of the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Overview,
    Visits,
    Content,
    Users,
    Payments,
    Favorites,
}

/// Headline counters plus the visit trend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewReport {
    pub total_users: u64,
    pub new_users: u64,
    pub active_users: u64,
    pub total_courses: u64,
    pub total_programs: u64,
    pub total_visits: u64,
    pub total_favorites: u64,
    pub total_revenue: f64,
    pub visits_trend: Vec<MetricPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitReport {
    pub total_visits: u64,
    pub unique_visitors: u64,
    pub series: Vec<MetricPoint>,
    pub top_pages: Vec<RankedEntry>,
    pub by_device: Distribution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentReport {
    pub total_courses: u64,
    pub total_programs: u64,
    /// Ranked by views; `count` carries the view count.
    pub top_courses: Vec<RankedEntry>,
    pub top_programs: Vec<RankedEntry>,
    pub by_category: Distribution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserReport {
    pub total_users: u64,
    pub new_users: u64,
    pub active_users: u64,
    pub registrations: Vec<MetricPoint>,
    pub by_role: Distribution,
    pub most_active: Vec<RankedEntry>,
}

/// Revenue and payment-status breakdown.
///
/// `currency` is the settlement currency the backend reported, if any;
/// renderers prefer it over the configured default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentReport {
    pub total_revenue: f64,
    pub total_payments: u64,
    pub currency: Option<String>,
    pub by_status: Distribution,
    pub revenue: Vec<MetricPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoritesReport {
    pub total_favorites: u64,
    pub top_courses: Vec<RankedEntry>,
    pub top_programs: Vec<RankedEntry>,
}
