// Admin API response types
//
// Every endpoint wraps its payload as `{ "data": ... }`. Fields use
// `#[serde(default)]` throughout because the backend omits empty
// aggregates, and numeric fields are kept as raw `serde_json::Value`
// since the backend sometimes serializes counts and amounts as strings.
// Coercion into definite numbers happens in `edudash-core`.
//
// Lists and labels go through the lenient helpers below: a `null` or
// mistyped list decodes as empty, and a label that is not a string or
// number decodes as `None`. A malformed field never fails the envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Envelope ─────────────────────────────────────────────────────────

/// Standard response envelope: `{ "data": <payload> }`.
///
/// A missing or `null` `data` decodes as `None`; the client substitutes
/// the payload's `Default`.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Option<T>,
}

/// Error body shape: the backend uses either `message` or `error`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    #[serde(deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}

// ── Lenient field decoding ───────────────────────────────────────────

/// Any non-array decodes as an empty list; elements that do not match
/// the item schema are dropped.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Strings pass through, numbers become their text form, anything else is `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<Option<T>>(value).ok().flatten())
}

// ── Shared building blocks ───────────────────────────────────────────

/// One point of a server-aggregated time series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPeriodCount {
    /// Period label: `"2024-05-01"`, `"2024-W18"`, `"2024-05"`, or a bare number.
    pub period: Value,
    pub count: Value,
}

/// One point of a revenue time series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPeriodAmount {
    pub period: Value,
    pub amount: Value,
}

/// Compact course/program reference embedded in ranked lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawItemRef {
    pub id: Value,
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    pub price: Value,
    /// Thumbnail path; may be relative to the API origin.
    #[serde(deserialize_with = "lenient_text")]
    pub thumbnail: Option<String>,
}

// ── Overview ─────────────────────────────────────────────────────────

/// `GET admin/statistics/overview`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverviewPayload {
    pub total_users: Value,
    pub new_users: Value,
    pub active_users: Value,
    pub total_courses: Value,
    pub total_programs: Value,
    pub total_visits: Value,
    pub total_favorites: Value,
    pub total_revenue: Value,
    #[serde(deserialize_with = "lenient_vec")]
    pub visits_trend: Vec<RawPeriodCount>,
}

// ── Visits ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPageVisits {
    #[serde(deserialize_with = "lenient_text")]
    pub path: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    pub visits: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawDeviceCount {
    #[serde(deserialize_with = "lenient_text")]
    pub device: Option<String>,
    pub count: Value,
}

/// `GET admin/statistics/visits`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisitsPayload {
    pub total_visits: Value,
    pub unique_visitors: Value,
    #[serde(deserialize_with = "lenient_vec")]
    pub series: Vec<RawPeriodCount>,
    #[serde(deserialize_with = "lenient_vec")]
    pub top_pages: Vec<RawPageVisits>,
    #[serde(deserialize_with = "lenient_vec")]
    pub by_device: Vec<RawDeviceCount>,
}

// ── Content ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawContentStat {
    pub id: Value,
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    pub views: Value,
    pub enrollments: Value,
    pub price: Value,
    #[serde(deserialize_with = "lenient_text")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawCategoryCount {
    #[serde(deserialize_with = "lenient_text")]
    pub category: Option<String>,
    pub count: Value,
}

/// `GET admin/statistics/content`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentPayload {
    pub total_courses: Value,
    pub total_programs: Value,
    #[serde(deserialize_with = "lenient_vec")]
    pub top_courses: Vec<RawContentStat>,
    #[serde(deserialize_with = "lenient_vec")]
    pub top_programs: Vec<RawContentStat>,
    #[serde(deserialize_with = "lenient_vec")]
    pub by_category: Vec<RawCategoryCount>,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawRoleCount {
    #[serde(deserialize_with = "lenient_text")]
    pub role: Option<String>,
    pub count: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawActiveUser {
    pub id: Value,
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    pub activity: Value,
}

/// `GET admin/statistics/users`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsersPayload {
    pub total_users: Value,
    pub new_users: Value,
    pub active_users: Value,
    #[serde(deserialize_with = "lenient_vec")]
    pub registrations: Vec<RawPeriodCount>,
    #[serde(deserialize_with = "lenient_vec")]
    pub by_role: Vec<RawRoleCount>,
    #[serde(deserialize_with = "lenient_vec")]
    pub most_active: Vec<RawActiveUser>,
}

// ── Payments ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawStatusCount {
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
    pub count: Value,
    pub amount: Value,
}

/// `GET admin/statistics/payments`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentsPayload {
    pub total_revenue: Value,
    pub total_payments: Value,
    /// ISO currency code the backend settles in, when it reports one.
    #[serde(deserialize_with = "lenient_text")]
    pub currency: Option<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub by_status: Vec<RawStatusCount>,
    #[serde(deserialize_with = "lenient_vec")]
    pub revenue: Vec<RawPeriodAmount>,
}

// ── Favorites ────────────────────────────────────────────────────────

/// A favorited course with its (possibly absent) embedded course record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawFavoriteCourse {
    pub course_id: Value,
    #[serde(deserialize_with = "lenient_opt")]
    pub course: Option<RawItemRef>,
    pub count: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawFavoriteProgram {
    pub program_id: Value,
    #[serde(deserialize_with = "lenient_opt")]
    pub program: Option<RawItemRef>,
    pub count: Value,
}

/// `GET admin/statistics/favorites`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FavoritesPayload {
    pub total_favorites: Value,
    #[serde(deserialize_with = "lenient_vec")]
    pub top_courses: Vec<RawFavoriteCourse>,
    #[serde(deserialize_with = "lenient_vec")]
    pub top_programs: Vec<RawFavoriteProgram>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_with_null_data_decodes_to_none() {
        let env: DataEnvelope<VisitsPayload> = serde_json::from_value(json!({ "data": null })).unwrap();
        assert!(env.data.is_none());

        let env: DataEnvelope<VisitsPayload> = serde_json::from_value(json!({})).unwrap();
        assert!(env.data.is_none());
    }

    #[test]
    fn payload_tolerates_missing_and_string_fields() {
        let payload: PaymentsPayload = serde_json::from_value(json!({
            "totalRevenue": "1520.5",
            "byStatus": [{ "status": "completed", "count": "80" }]
        }))
        .unwrap();

        assert_eq!(payload.total_revenue, json!("1520.5"));
        assert_eq!(payload.by_status.len(), 1);
        assert_eq!(payload.by_status[0].count, json!("80"));
        assert!(payload.by_status[0].amount.is_null());
        assert!(payload.revenue.is_empty());
        assert!(payload.currency.is_none());
    }

    #[test]
    fn favorite_course_without_embedded_record() {
        let item: RawFavoriteCourse =
            serde_json::from_value(json!({ "courseId": 7, "count": 3 })).unwrap();
        assert_eq!(item.course_id, json!(7));
        assert!(item.course.is_none());
    }

    #[test]
    fn null_and_mistyped_lists_decode_as_empty() {
        let env: DataEnvelope<FavoritesPayload> = serde_json::from_value(json!({
            "data": { "totalFavorites": 3, "topCourses": null, "topPrograms": "n/a" }
        }))
        .unwrap();
        let payload = env.data.unwrap();
        assert!(payload.top_courses.is_empty());
        assert!(payload.top_programs.is_empty());
        assert_eq!(payload.total_favorites, json!(3));
    }

    #[test]
    fn malformed_list_items_are_dropped() {
        let payload: VisitsPayload = serde_json::from_value(json!({
            "series": [42, { "period": "2024-05-01", "count": 5 }, "junk"]
        }))
        .unwrap();
        assert_eq!(payload.series.len(), 1);
        assert_eq!(payload.series[0].count, json!(5));
    }

    #[test]
    fn non_string_labels_become_text_or_none() {
        let env: DataEnvelope<FavoritesPayload> = serde_json::from_value(json!({
            "data": {
                "topCourses": [
                    { "courseId": 1, "course": { "id": 1, "title": 42 }, "count": 2 },
                    { "courseId": 2, "course": "broken", "count": 1 }
                ]
            }
        }))
        .unwrap();
        let courses = env.data.unwrap().top_courses;
        assert_eq!(courses[0].course.as_ref().unwrap().title.as_deref(), Some("42"));
        assert!(courses[1].course.is_none());

        let payload: PaymentsPayload = serde_json::from_value(json!({
            "currency": null,
            "byStatus": [
                { "status": 1, "count": 4 },
                { "status": { "code": "x" }, "count": 1 }
            ]
        }))
        .unwrap();
        assert!(payload.currency.is_none());
        assert_eq!(payload.by_status[0].status.as_deref(), Some("1"));
        assert!(payload.by_status[1].status.is_none());
    }

    #[test]
    fn error_body_prefers_message_over_error() {
        let body: ErrorBody =
            serde_json::from_value(json!({ "message": "bad dates", "error": "E_RANGE" })).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("bad dates"));

        let body: ErrorBody = serde_json::from_value(json!({ "message": "  " })).unwrap();
        assert_eq!(body.into_message(), None);
    }
}
