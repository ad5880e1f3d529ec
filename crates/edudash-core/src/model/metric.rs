// ── Chart building blocks ──

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::coerce_non_negative;
use crate::percent::percentages;

/// One bucket of a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Bucket label as the server reported it (`"2024-05-01"`, `"2024-W18"`).
    pub period: String,
    /// Coerced, never negative.
    pub value: f64,
}

impl MetricPoint {
    pub fn new(period: impl Into<String>, value: &Value) -> Self {
        Self {
            period: period.into(),
            value: coerce_non_negative(value),
        }
    }
}

/// One row of a top-N list, in server order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub id: String,
    /// Full derived label: the title, or `"<Kind> <id>"`.
    pub label: String,
    /// `label` shortened for the rendering context.
    pub display_label: String,
    pub count: f64,
    pub price: Option<f64>,
    pub thumbnail_url: Option<String>,
}

/// A labelled share of a grouped count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub category: String,
    pub count: f64,
    /// Share of [`Distribution::total`], one decimal, in `[0, 100]`.
    pub percentage: f64,
}

/// Grouped counts with their share of the total, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub slices: Vec<DistributionSlice>,
    pub total: f64,
}

impl Distribution {
    /// Build from `(category, raw count)` pairs.
    ///
    /// Each count is coerced before the total is summed, so a string count
    /// contributes its numeric value rather than poisoning the sum.
    pub fn from_pairs<'a, S, I>(pairs: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, &'a Value)>,
    {
        let (categories, counts): (Vec<String>, Vec<f64>) = pairs
            .into_iter()
            .map(|(category, count)| (category.into(), coerce_non_negative(count)))
            .unzip();

        let total = counts.iter().sum();
        let slices = categories
            .into_iter()
            .zip(counts.iter().copied())
            .zip(percentages(&counts))
            .map(|((category, count), percentage)| DistributionSlice {
                category,
                count,
                percentage,
            })
            .collect();

        Self { slices, total }
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DistributionSlice> {
        self.slices.iter()
    }
}

impl<'a> IntoIterator for &'a Distribution {
    type Item = &'a DistributionSlice;
    type IntoIter = std::slice::Iter<'a, DistributionSlice>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.iter()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn string_counts_are_coerced_before_summing() {
        let completed = json!("80");
        let pending = json!("20");
        let dist = Distribution::from_pairs([("Completed", &completed), ("Pending", &pending)]);

        assert_eq!(dist.total, 100.0);
        assert_eq!(
            dist.slices,
            vec![
                DistributionSlice {
                    category: "Completed".into(),
                    count: 80.0,
                    percentage: 80.0,
                },
                DistributionSlice {
                    category: "Pending".into(),
                    count: 20.0,
                    percentage: 20.0,
                },
            ]
        );
    }

    #[test]
    fn zero_total_keeps_slices_at_zero_percent() {
        let zero = json!(0);
        let missing = json!(null);
        let dist = Distribution::from_pairs([("a", &zero), ("b", &missing)]);
        assert_eq!(dist.total, 0.0);
        assert!(dist.iter().all(|s| s.percentage == 0.0));
        assert_eq!(dist.len(), 2);
    }

    #[test]
    fn metric_point_clamps_negative_values() {
        assert_eq!(MetricPoint::new("2024-05", &json!(-3)).value, 0.0);
        assert_eq!(MetricPoint::new("2024-05", &json!("12")).value, 12.0);
    }
}
