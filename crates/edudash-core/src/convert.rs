// ── API-to-domain conversions ──
//
// Bridges raw `edudash_api` payloads into the render-ready types in
// `crate::model`. Loose numerics are coerced, ranked lists are sliced to
// the configured top-N and labelled, grouped counts become distributions.
// Nothing here can fail: malformed fields degrade to zero or a fallback
// label.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use edudash_api::models::{
    ContentPayload, FavoritesPayload, OverviewPayload, PaymentsPayload, RawActiveUser,
    RawContentStat, RawFavoriteCourse, RawFavoriteProgram, RawItemRef, RawPageVisits,
    RawPeriodAmount, RawPeriodCount, UsersPayload, VisitsPayload,
};

use crate::coerce::{coerce_count, coerce_non_negative, coerce_number, coerce_present};
use crate::label::{EntityKind, LabelPolicy, derive_label, humanize_category, id_text};
use crate::model::{
    ContentReport, Distribution, FavoritesReport, MetricPoint, OverviewReport, PaymentReport,
    RankedEntry, UserReport, VisitReport,
};
use crate::ranking::{DEFAULT_TOP_N, RankedSource, rank_entries};

/// How ranked lists are cut and labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub top_n: usize,
    pub labels: LabelPolicy,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            labels: LabelPolicy::TABLE,
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Period labels arrive as strings or bare numbers (week/month index).
fn period_text(period: &Value) -> String {
    match period {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn series(points: &[RawPeriodCount]) -> Vec<MetricPoint> {
    points
        .iter()
        .map(|p| MetricPoint::new(period_text(&p.period), &p.count))
        .collect()
}

fn amount_series(points: &[RawPeriodAmount]) -> Vec<MetricPoint> {
    points
        .iter()
        .map(|p| MetricPoint::new(period_text(&p.period), &p.amount))
        .collect()
}

fn entry(
    kind: EntityKind,
    policy: LabelPolicy,
    id: &Value,
    title: Option<&str>,
    count: &Value,
    price: &Value,
    thumbnail: Option<&str>,
) -> RankedEntry {
    let label = derive_label(title, kind, id);
    RankedEntry {
        id: id_text(id).unwrap_or_default(),
        display_label: policy.apply(&label),
        label,
        count: coerce_non_negative(count),
        price: coerce_present(price),
        thumbnail_url: thumbnail
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned),
    }
}

/// Prefer the embedded record's id, falling back to the foreign key.
fn favorite_entry(
    kind: EntityKind,
    policy: LabelPolicy,
    foreign_id: &Value,
    item: Option<&RawItemRef>,
    count: &Value,
) -> RankedEntry {
    let id = item
        .map(|i| &i.id)
        .filter(|id| id_text(id).is_some())
        .unwrap_or(foreign_id);
    entry(
        kind,
        policy,
        id,
        item.and_then(|i| i.title.as_deref()),
        count,
        item.map_or(&Value::Null, |i| &i.price),
        item.and_then(|i| i.thumbnail.as_deref()),
    )
}

// ── Ranked sources ─────────────────────────────────────────────────

impl RankedSource for RawContentStat {
    fn to_entry(&self, kind: EntityKind, policy: LabelPolicy) -> RankedEntry {
        entry(
            kind,
            policy,
            &self.id,
            self.title.as_deref(),
            &self.views,
            &self.price,
            self.thumbnail.as_deref(),
        )
    }
}

impl RankedSource for RawFavoriteCourse {
    fn to_entry(&self, kind: EntityKind, policy: LabelPolicy) -> RankedEntry {
        favorite_entry(kind, policy, &self.course_id, self.course.as_ref(), &self.count)
    }
}

impl RankedSource for RawFavoriteProgram {
    fn to_entry(&self, kind: EntityKind, policy: LabelPolicy) -> RankedEntry {
        favorite_entry(kind, policy, &self.program_id, self.program.as_ref(), &self.count)
    }
}

impl RankedSource for RawPageVisits {
    fn to_entry(&self, kind: EntityKind, policy: LabelPolicy) -> RankedEntry {
        let id = self
            .path
            .as_deref()
            .map_or(Value::Null, |p| Value::String(p.to_owned()));
        entry(
            kind,
            policy,
            &id,
            self.title.as_deref(),
            &self.visits,
            &Value::Null,
            None,
        )
    }
}

impl RankedSource for RawActiveUser {
    fn to_entry(&self, kind: EntityKind, policy: LabelPolicy) -> RankedEntry {
        let title = self
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref());
        entry(kind, policy, &self.id, title, &self.activity, &Value::Null, None)
    }
}

// ── Reports ────────────────────────────────────────────────────────

impl From<&OverviewPayload> for OverviewReport {
    fn from(raw: &OverviewPayload) -> Self {
        Self {
            total_users: coerce_count(&raw.total_users),
            new_users: coerce_count(&raw.new_users),
            active_users: coerce_count(&raw.active_users),
            total_courses: coerce_count(&raw.total_courses),
            total_programs: coerce_count(&raw.total_programs),
            total_visits: coerce_count(&raw.total_visits),
            total_favorites: coerce_count(&raw.total_favorites),
            total_revenue: coerce_number(&raw.total_revenue),
            visits_trend: series(&raw.visits_trend),
        }
    }
}

impl From<&PaymentsPayload> for PaymentReport {
    fn from(raw: &PaymentsPayload) -> Self {
        let by_status = Distribution::from_pairs(raw.by_status.iter().map(|s| {
            (
                humanize_category(s.status.as_deref().unwrap_or_default()),
                &s.count,
            )
        }));
        Self {
            total_revenue: coerce_number(&raw.total_revenue),
            total_payments: coerce_count(&raw.total_payments),
            currency: raw
                .currency
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_uppercase),
            by_status,
            revenue: amount_series(&raw.revenue),
        }
    }
}

pub fn visit_report(raw: &VisitsPayload, view: Presentation) -> VisitReport {
    VisitReport {
        total_visits: coerce_count(&raw.total_visits),
        unique_visitors: coerce_count(&raw.unique_visitors),
        series: series(&raw.series),
        top_pages: rank_entries(&raw.top_pages, view.top_n, EntityKind::Page, view.labels),
        by_device: Distribution::from_pairs(raw.by_device.iter().map(|d| {
            (
                humanize_category(d.device.as_deref().unwrap_or_default()),
                &d.count,
            )
        })),
    }
}

pub fn content_report(raw: &ContentPayload, view: Presentation) -> ContentReport {
    ContentReport {
        total_courses: coerce_count(&raw.total_courses),
        total_programs: coerce_count(&raw.total_programs),
        top_courses: rank_entries(&raw.top_courses, view.top_n, EntityKind::Course, view.labels),
        top_programs: rank_entries(
            &raw.top_programs,
            view.top_n,
            EntityKind::Program,
            view.labels,
        ),
        by_category: Distribution::from_pairs(raw.by_category.iter().map(|c| {
            (
                humanize_category(c.category.as_deref().unwrap_or_default()),
                &c.count,
            )
        })),
    }
}

pub fn user_report(raw: &UsersPayload, view: Presentation) -> UserReport {
    UserReport {
        total_users: coerce_count(&raw.total_users),
        new_users: coerce_count(&raw.new_users),
        active_users: coerce_count(&raw.active_users),
        registrations: series(&raw.registrations),
        by_role: Distribution::from_pairs(raw.by_role.iter().map(|r| {
            (
                humanize_category(r.role.as_deref().unwrap_or_default()),
                &r.count,
            )
        })),
        most_active: rank_entries(&raw.most_active, view.top_n, EntityKind::User, view.labels),
    }
}

pub fn favorites_report(raw: &FavoritesPayload, view: Presentation) -> FavoritesReport {
    FavoritesReport {
        total_favorites: coerce_count(&raw.total_favorites),
        top_courses: rank_entries(&raw.top_courses, view.top_n, EntityKind::Course, view.labels),
        top_programs: rank_entries(
            &raw.top_programs,
            view.top_n,
            EntityKind::Program,
            view.labels,
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload<T: serde::de::DeserializeOwned>(value: Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn payment_distribution_from_string_counts() {
        let raw: PaymentsPayload = payload(json!({
            "totalRevenue": "15000.5",
            "currency": " dzd ",
            "byStatus": [
                { "status": "completed", "count": "80" },
                { "status": "pending", "count": "20" }
            ]
        }));
        let report = PaymentReport::from(&raw);

        let rows: Vec<_> = report
            .by_status
            .iter()
            .map(|s| (s.category.as_str(), s.count, s.percentage))
            .collect();
        assert_eq!(rows, vec![("Completed", 80.0, 80.0), ("Pending", 20.0, 20.0)]);
        assert_eq!(report.total_revenue, 15000.5);
        assert_eq!(report.currency.as_deref(), Some("DZD"));
    }

    #[test]
    fn favorites_without_titles_fall_back_to_kind_and_id() {
        let raw: FavoritesPayload = payload(json!({
            "totalFavorites": 9,
            "topCourses": [
                { "courseId": 11, "count": 5 },
                { "courseId": 12, "count": "3" },
                { "courseId": 13, "course": { "title": "" }, "count": 1 }
            ]
        }));
        let report = favorites_report(&raw, Presentation::default());

        let labels: Vec<_> = report.top_courses.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Course 11", "Course 12", "Course 13"]);
        assert_eq!(report.top_courses[1].count, 3.0);
        assert!(report.top_programs.is_empty());
        assert_eq!(report.total_favorites, 9);
    }

    #[test]
    fn ranked_lists_are_cut_without_resorting() {
        let courses: Vec<Value> = (1..=10)
            .map(|i| json!({ "id": i, "title": format!("Course number {i}"), "views": 100 - i }))
            .collect();
        let raw: ContentPayload = payload(json!({ "topCourses": courses }));

        let view = Presentation {
            top_n: 6,
            labels: LabelPolicy::CHART_AXIS,
        };
        let report = content_report(&raw, view);

        assert_eq!(report.top_courses.len(), 6);
        let ids: Vec<_> = report.top_courses.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
        assert_eq!(report.top_courses[0].label, "Course number 1");
        assert_eq!(report.top_courses[0].display_label, "Course number 1");
        assert_eq!(report.top_courses[5].count, 94.0);
    }

    #[test]
    fn embedded_record_supplies_title_price_and_thumbnail() {
        let raw: FavoritesPayload = payload(json!({
            "topPrograms": [{
                "programId": 4,
                "program": {
                    "id": 4,
                    "title": "Full-Stack Web Development Bootcamp",
                    "price": "4500",
                    "thumbnail": "/uploads/programs/4.jpg"
                },
                "count": 12
            }]
        }));
        let report = favorites_report(&raw, Presentation::default());
        let entry = &report.top_programs[0];

        assert_eq!(entry.label, "Full-Stack Web Development Bootcamp");
        assert_eq!(entry.display_label, "Full-Stack Web Devel...");
        assert_eq!(entry.price, Some(4500.0));
        assert_eq!(entry.thumbnail_url.as_deref(), Some("/uploads/programs/4.jpg"));
    }

    #[test]
    fn overview_coerces_counters() {
        let raw: OverviewPayload = payload(json!({
            "totalUsers": "120",
            "activeUsers": null,
            "totalRevenue": "n/a",
            "visitsTrend": [{ "period": "2024-05-01", "count": "7" }, { "period": 18, "count": -2 }]
        }));
        let report = OverviewReport::from(&raw);

        assert_eq!(report.total_users, 120);
        assert_eq!(report.active_users, 0);
        assert_eq!(report.total_revenue, 0.0);
        assert_eq!(
            report.visits_trend,
            vec![
                MetricPoint {
                    period: "2024-05-01".into(),
                    value: 7.0
                },
                MetricPoint {
                    period: "18".into(),
                    value: 0.0
                },
            ]
        );
    }

    #[test]
    fn visits_pages_and_devices() {
        let raw: VisitsPayload = payload(json!({
            "topPages": [{ "path": "/courses", "visits": 90 }, { "title": "Home", "visits": "10" }],
            "byDevice": [{ "device": "desktop", "count": 3 }, { "device": "mobile", "count": 1 }]
        }));
        let report = visit_report(&raw, Presentation::default());

        assert_eq!(report.top_pages[0].label, "Page /courses");
        assert_eq!(report.top_pages[1].label, "Home");
        let shares: Vec<_> = report.by_device.iter().map(|s| s.percentage).collect();
        assert_eq!(shares, vec![75.0, 25.0]);
    }

    #[test]
    fn active_users_use_name_then_email() {
        let raw: UsersPayload = payload(json!({
            "mostActive": [
                { "id": 1, "name": "Amina", "activity": 40 },
                { "id": 2, "name": " ", "email": "b@example.com", "activity": 10 },
                { "id": 3, "activity": 5 }
            ],
            "byRole": [{ "role": "student", "count": 9 }, { "role": "instructor", "count": 1 }]
        }));
        let report = user_report(&raw, Presentation::default());

        let labels: Vec<_> = report.most_active.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Amina", "b@example.com", "User 3"]);
        assert_eq!(report.by_role.total, 10.0);
    }
}
