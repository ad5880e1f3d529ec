// ── Course / program form validation ──
//
// Every failing field is reported at once; a submission goes out only
// when the list is empty.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use strum::{Display, EnumString};

use crate::coerce::coerce_present;

pub const TITLE_MAX_CHARS: usize = 120;

/// Difficulty levels accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

/// Editable fields of a course or program, as entered.
///
/// Numeric fields stay textual until validated so that `"abc"` can be
/// reported instead of silently becoming zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordForm {
    pub title: String,
    pub description: String,
    pub price: Option<String>,
    pub duration_hours: Option<String>,
    pub level: Option<String>,
}

/// One invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All invalid fields of one submission, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == name)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s)", self.errors.len())?;
        for (i, e) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{} {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value
        .map(String::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Parse an optional non-negative number; `Err` carries the message.
fn non_negative(raw: Option<&String>) -> Result<Option<f64>, &'static str> {
    let Some(raw) = non_blank(raw) else {
        return Ok(None);
    };
    match coerce_present(&Value::String(raw.to_owned())) {
        Some(n) if n >= 0.0 => Ok(Some(n)),
        Some(_) => Err("must not be negative"),
        None => Err("must be a number"),
    }
}

impl RecordForm {
    /// Check every field, collecting all failures.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title", "is required");
        } else if title.chars().count() > TITLE_MAX_CHARS {
            errors.push(
                "title",
                format!("must be at most {TITLE_MAX_CHARS} characters"),
            );
        }

        if self.description.trim().is_empty() {
            errors.push("description", "is required");
        }

        if let Err(message) = non_negative(self.price.as_ref()) {
            errors.push("price", message);
        }
        if let Err(message) = non_negative(self.duration_hours.as_ref()) {
            errors.push("duration_hours", message);
        }

        if non_blank(self.level.as_ref()).is_some_and(|l| l.parse::<Level>().is_err()) {
            errors.push("level", "must be one of beginner, intermediate, advanced");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Validate, then build the JSON body for the record update.
    ///
    /// Blank optional fields are omitted rather than sent as empty strings.
    pub fn to_update_body(&self) -> Result<Value, ValidationErrors> {
        self.validate()?;

        let mut body = Map::new();
        body.insert("title".into(), json!(self.title.trim()));
        body.insert("description".into(), json!(self.description.trim()));
        if let Ok(Some(price)) = non_negative(self.price.as_ref()) {
            body.insert("price".into(), json!(price));
        }
        if let Ok(Some(hours)) = non_negative(self.duration_hours.as_ref()) {
            body.insert("durationHours".into(), json!(hours));
        }
        if let Some(level) = non_blank(self.level.as_ref()).and_then(|l| l.parse::<Level>().ok()) {
            body.insert("level".into(), json!(level));
        }
        Ok(Value::Object(body))
    }
}
