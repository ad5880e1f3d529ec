// ── Render-ready domain model ──
//
// Every type here is the normalized, chart/table-ready form of one
// analytics payload. Numbers are definite, labels are derived, and
// nothing outlives a single fetch.

pub mod metric;
pub mod report;

pub use metric::{Distribution, DistributionSlice, MetricPoint, RankedEntry};
pub use report::{
    ContentReport, FavoritesReport, OverviewReport, PaymentReport, ReportKind, UserReport,
    VisitReport,
};
