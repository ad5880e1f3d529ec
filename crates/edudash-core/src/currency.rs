// ── Currency display ──
//
// Amounts are rendered as "<CODE> <amount>" with exactly two fraction
// digits. Supported locales get digit grouping; anything else falls back
// to an ungrouped amount with a `.` decimal separator. Formatting never
// fails and never drops the code. Amounts outside `Decimal`'s range are
// printed from the `f64` with the same code and two fraction digits.

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::coerce_number;

/// Currency used when none is configured or the configured code is blank.
pub const DEFAULT_CURRENCY: &str = "DZD";

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// Separators for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NumberStyle {
    group: &'static str,
    decimal: &'static str,
}

const FALLBACK_STYLE: NumberStyle = NumberStyle {
    group: "",
    decimal: ".",
};

/// Formats amounts for one currency and locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormatter {
    code: String,
    locale: String,
}

impl CurrencyFormatter {
    /// Build a formatter. The code is trimmed and uppercased; a blank code
    /// becomes [`DEFAULT_CURRENCY`].
    pub fn new(code: &str, locale: &str) -> Self {
        let code = code.trim().to_uppercase();
        Self {
            code: if code.is_empty() {
                DEFAULT_CURRENCY.to_owned()
            } else {
                code
            },
            locale: locale.trim().to_owned(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Same locale, different currency. Used when the backend reports the
    /// settlement currency alongside the amounts.
    #[must_use]
    pub fn with_code(&self, code: &str) -> Self {
        Self::new(code, &self.locale)
    }

    /// Format a loosely typed amount. `null` and garbage format as zero.
    pub fn format(&self, amount: &Value) -> String {
        let exact = match amount {
            Value::String(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        };
        match exact {
            Some(decimal) => self.format_decimal(decimal),
            None => self.format_f64(coerce_number(amount)),
        }
    }

    /// Format an already coerced amount. Non-finite input formats as zero.
    pub fn format_f64(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        match Decimal::from_f64(amount) {
            Some(decimal) => self.format_decimal(decimal),
            None => self.format_plain(amount),
        }
    }

    pub fn format_decimal(&self, amount: Decimal) -> String {
        let style = if is_iso_code(&self.code) {
            style_for(&self.locale).unwrap_or(FALLBACK_STYLE)
        } else {
            FALLBACK_STYLE
        };
        match render(amount, style) {
            Some(text) => format!("{} {text}", self.code),
            None => self.format_plain(amount.to_f64().unwrap_or_default()),
        }
    }

    /// `"<CODE> <amount>"` straight from the float, for magnitudes the
    /// decimal path cannot hold at two fraction digits.
    fn format_plain(&self, amount: f64) -> String {
        let amount = if amount.abs() < 0.005 { 0.0 } else { amount };
        format!("{} {amount:.2}", self.code)
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY, DEFAULT_LOCALE)
    }
}

fn is_iso_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Separators keyed by the language subtag (`fr-DZ` → `fr`).
fn style_for(locale: &str) -> Option<NumberStyle> {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        "en" => Some(NumberStyle {
            group: ",",
            decimal: ".",
        }),
        "fr" => Some(NumberStyle {
            group: " ",
            decimal: ",",
        }),
        "de" | "ar" => Some(NumberStyle {
            group: ".",
            decimal: ",",
        }),
        _ => None,
    }
}

/// `None` when the mantissa has no room for two fraction digits.
fn render(amount: Decimal, style: NumberStyle) -> Option<String> {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded.scale() != 2 {
        return None;
    }
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }

    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    Some(format!(
        "{sign}{}{}{frac_part}",
        group_digits(int_part, style.group),
        style.decimal
    ))
}

fn group_digits(digits: &str, separator: &str) -> String {
    if separator.is_empty() {
        return digits.to_owned();
    }
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
