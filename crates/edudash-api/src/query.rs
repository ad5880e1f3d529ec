// Analytics query parameters
//
// Every statistics endpoint accepts the same query string:
// `startDate`, `endDate`, and optional `groupBy`, `type`, `limit`, `page`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Date format the backend expects for `startDate` / `endDate`.
pub const DATE_PARAM_FORMAT: &str = "%Y-%m-%d";

/// Time-series bucket granularity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Day,
    Week,
    Month,
    Year,
}

/// Query parameters shared by every `admin/statistics/*` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub group_by: Option<GroupBy>,
    /// Endpoint-specific filter sent as `type` (e.g. `course` / `program`).
    pub kind: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl AnalyticsQuery {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            group_by: None,
            kind: None,
            limit: None,
            page: None,
        }
    }

    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Render as `(name, value)` pairs in a stable order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            (
                "startDate",
                self.start_date.format(DATE_PARAM_FORMAT).to_string(),
            ),
            ("endDate", self.end_date.format(DATE_PARAM_FORMAT).to_string()),
        ];
        if let Some(group_by) = self.group_by {
            params.push(("groupBy", group_by.to_string()));
        }
        if let Some(ref kind) = self.kind {
            params.push(("type", kind.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn minimal_query_has_only_dates() {
        let q = AnalyticsQuery::new(date(2024, 4, 1), date(2024, 5, 1));
        assert_eq!(
            q.to_params(),
            vec![
                ("startDate", "2024-04-01".to_owned()),
                ("endDate", "2024-05-01".to_owned()),
            ]
        );
    }

    #[test]
    fn optional_params_follow_dates() {
        let q = AnalyticsQuery::new(date(2024, 1, 1), date(2024, 1, 31))
            .group_by(GroupBy::Week)
            .kind("course")
            .limit(10)
            .page(2);
        let params = q.to_params();
        assert_eq!(params.len(), 6);
        assert_eq!(params[2], ("groupBy", "week".to_owned()));
        assert_eq!(params[3], ("type", "course".to_owned()));
        assert_eq!(params[4], ("limit", "10".to_owned()));
        assert_eq!(params[5], ("page", "2".to_owned()));
    }

    #[test]
    fn group_by_parses_case_insensitively() {
        assert_eq!("Month".parse::<GroupBy>().unwrap(), GroupBy::Month);
        assert_eq!("year".parse::<GroupBy>().unwrap(), GroupBy::Year);
        assert!("fortnight".parse::<GroupBy>().is_err());
    }
}
