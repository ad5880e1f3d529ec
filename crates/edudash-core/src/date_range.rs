// ── Reporting window ──

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use edudash_api::AnalyticsQuery;
use edudash_api::query::DATE_PARAM_FORMAT as PARAM_FORMAT;

use crate::error::CoreError;

/// Length of the window used when the user has not picked one.
pub const DEFAULT_WINDOW_DAYS: u64 = 30;

/// Inclusive `[start, end]` window sent with every analytics request.
///
/// Pure request state: the server never stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Explicit window. `start` may equal `end` but not follow it.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidDateRange {
                start: start.format(PARAM_FORMAT).to_string(),
                end: end.format(PARAM_FORMAT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Window ending on `today` and starting `days` earlier.
    pub fn trailing(today: NaiveDate, days: u64) -> Self {
        let start = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// The 30-day trailing window for a given day.
    pub fn default_for(today: NaiveDate) -> Self {
        Self::trailing(today, DEFAULT_WINDOW_DAYS)
    }

    /// The 30-day trailing window ending on the local calendar date.
    ///
    /// Reads the clock once; callers hold the result for the lifetime of a
    /// view rather than recomputing it per request.
    pub fn default_now() -> Self {
        Self::default_for(Local::now().date_naive())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn start_param(&self) -> String {
        self.start.format(PARAM_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(PARAM_FORMAT).to_string()
    }

    /// Whole days between `start` and `end`.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Base query for this window; callers layer grouping and limits on top.
    pub fn to_query(&self) -> AnalyticsQuery {
        AnalyticsQuery::new(self.start, self.end)
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::default_now()
    }
}
