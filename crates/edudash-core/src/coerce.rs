// ── Numeric coercion ──
//
// The backend serializes counts and amounts inconsistently: numbers,
// numeric strings, `null`, or not at all. Everything that feeds
// arithmetic or a chart goes through these helpers first, so the result
// is always a finite `f64`.

use serde_json::Value;

/// Convert a loosely typed JSON value into a finite number.
///
/// Numbers pass through; strings are trimmed and parsed. `null`, booleans,
/// arrays, objects, empty or unparseable strings, and non-finite results
/// (`"NaN"`, `"inf"`, overflow) all map to `0.0`.
pub fn coerce_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// [`coerce_number`] for a field that may be absent entirely.
pub fn coerce_opt(value: Option<&Value>) -> f64 {
    value.map_or(0.0, coerce_number)
}

/// [`coerce_number`] clamped to be non-negative (counts, visit totals).
pub fn coerce_non_negative(value: &Value) -> f64 {
    coerce_number(value).max(0.0)
}

/// Like [`coerce_number`] but distinguishes "no usable value" from zero.
///
/// Used for passthrough fields such as price, where an absent price should
/// render as a dash rather than `0.00`.
pub fn coerce_present(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Sum a sequence of loose values, coercing each element before adding.
pub fn sum_coerced<'a>(values: impl IntoIterator<Item = &'a Value>) -> f64 {
    values.into_iter().map(coerce_number).sum()
}

/// Whole-number view of a coerced count, saturating at `u64::MAX`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn coerce_count(value: &Value) -> u64 {
    // `as` saturates for out-of-range floats; negatives were clamped already.
    coerce_non_negative(value).round() as u64
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_garbage_inputs_are_zero() {
        for v in [
            json!(null),
            json!(""),
            json!("   "),
            json!("abc"),
            json!("12abc"),
            json!("NaN"),
            json!("inf"),
            json!(true),
            json!([1, 2]),
            json!({ "n": 1 }),
        ] {
            assert_eq!(coerce_number(&v), 0.0, "input {v}");
        }
        assert_eq!(coerce_opt(None), 0.0);
    }

    #[test]
    fn numeric_strings_parse() {
        assert_eq!(coerce_number(&json!("42")), 42.0);
        assert_eq!(coerce_number(&json!("3.14")), 3.14);
        assert_eq!(coerce_number(&json!(" 7 ")), 7.0);
        assert_eq!(coerce_number(&json!("-2.5")), -2.5);
        assert_eq!(coerce_number(&json!("1e3")), 1000.0);
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(coerce_number(&json!(0)), 0.0);
        assert_eq!(coerce_number(&json!(1500)), 1500.0);
        assert_eq!(coerce_number(&json!(19.99)), 19.99);
    }

    #[test]
    fn non_negative_clamps() {
        assert_eq!(coerce_non_negative(&json!(-4)), 0.0);
        assert_eq!(coerce_non_negative(&json!("9")), 9.0);
        assert_eq!(coerce_count(&json!("80")), 80);
        assert_eq!(coerce_count(&json!(2.6)), 3);
        assert_eq!(coerce_count(&json!(-1)), 0);
    }

    #[test]
    fn sum_coerces_each_element_first() {
        let values = [json!("80"), json!(20), json!(null), json!("x")];
        assert_eq!(sum_coerced(&values), 100.0);
    }

    #[test]
    fn present_distinguishes_absent_from_zero() {
        assert_eq!(coerce_present(&json!(null)), None);
        assert_eq!(coerce_present(&json!("")), None);
        assert_eq!(coerce_present(&json!("free")), None);
        assert_eq!(coerce_present(&json!(0)), Some(0.0));
        assert_eq!(coerce_present(&json!("0.00")), Some(0.0));
        assert_eq!(coerce_present(&json!("4500")), Some(4500.0));
    }
}
