// ── Display labels ──
//
// Ranked entities frequently arrive without a title (deleted course,
// partial join on the backend). Labels fall back to "<Kind> <id>", and
// long labels are shortened for chart axes and table cells without
// touching the stored label.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Suffix appended to a truncated label.
pub const ELLIPSIS: &str = "...";

/// Label used when neither a title nor an id is available.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// The kind of entity a ranked row refers to; drives fallback labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum EntityKind {
    Course,
    Program,
    Page,
    User,
    Category,
}

/// Maximum display length for a rendering context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPolicy {
    pub max_chars: usize,
}

impl LabelPolicy {
    /// Chart axis ticks and legend entries.
    pub const CHART_AXIS: Self = Self { max_chars: 15 };
    /// Table cells.
    pub const TABLE: Self = Self { max_chars: 20 };

    pub const fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn apply(self, label: &str) -> String {
        truncate_label(label, self.max_chars)
    }
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self::TABLE
    }
}

/// Derive the label for an entity: its trimmed title when non-empty,
/// otherwise `"<Kind> <id>"`, otherwise [`UNKNOWN_LABEL`].
pub fn derive_label(title: Option<&str>, kind: EntityKind, id: &Value) -> String {
    if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_owned();
    }
    match id_text(id) {
        Some(id) => format!("{kind} {id}"),
        None => UNKNOWN_LABEL.to_owned(),
    }
}

/// Render an id value as text: strings trimmed, numbers as written.
/// `null`, empty strings and composite values have no id text.
pub fn id_text(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Shorten `label` to at most `max_chars` characters plus [`ELLIPSIS`].
///
/// Counts Unicode scalar values, so multi-byte titles are never split
/// mid-character. Labels within the limit come back unchanged.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    match label.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &label[..cut]),
        None => label.to_owned(),
    }
}

/// Turn a raw category key into a display label.
///
/// `"completed"` → `"Completed"`, `"in_progress"` → `"In progress"`,
/// `"past-due"` → `"Past due"`. Blank input yields [`UNKNOWN_LABEL`].
pub fn humanize_category(raw: &str) -> String {
    let spaced = raw.trim().replace(['_', '-'], " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            format!("{}{rest}", first.to_uppercase())
        }
        None => UNKNOWN_LABEL.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn title_wins_when_present() {
        assert_eq!(
            derive_label(Some("Intro to X"), EntityKind::Course, &json!(7)),
            "Intro to X"
        );
        assert_eq!(
            derive_label(Some("  Padded  "), EntityKind::Course, &json!(7)),
            "Padded"
        );
    }

    #[test]
    fn empty_title_falls_back_to_kind_and_id() {
        assert_eq!(derive_label(Some(""), EntityKind::Course, &json!(7)), "Course 7");
        assert_eq!(derive_label(None, EntityKind::Program, &json!("p-12")), "Program p-12");
        assert_eq!(derive_label(Some("   "), EntityKind::User, &json!(3)), "User 3");
    }

    #[test]
    fn no_title_no_id_is_unknown() {
        assert_eq!(derive_label(None, EntityKind::Course, &json!(null)), "Unknown");
        assert_eq!(derive_label(None, EntityKind::Course, &json!("")), "Unknown");
    }

    #[test]
    fn truncation_appends_ellipsis_only_when_needed() {
        assert_eq!(truncate_label("Intro to X", 15), "Intro to X");
        assert_eq!(truncate_label("exactly fifteen", 15), "exactly fifteen");
        assert_eq!(
            truncate_label("Advanced Distributed Systems", 15),
            "Advanced Distri..."
        );
        assert_eq!(truncate_label("", 15), "");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let arabic = "مقدمة في البرمجة المتقدمة";
        let cut = truncate_label(arabic, 5);
        assert_eq!(cut.chars().count(), 5 + ELLIPSIS.len());
        assert!(cut.ends_with(ELLIPSIS));
    }

    #[test]
    fn policy_presets() {
        let long = "Machine Learning Foundations";
        assert_eq!(LabelPolicy::CHART_AXIS.apply(long), "Machine Learnin...");
        assert_eq!(LabelPolicy::TABLE.apply(long), "Machine Learning Fou...");
        assert_eq!(LabelPolicy::default(), LabelPolicy::TABLE);
    }

    #[test]
    fn category_humanizing() {
        assert_eq!(humanize_category("completed"), "Completed");
        assert_eq!(humanize_category("in_progress"), "In progress");
        assert_eq!(humanize_category("PAST-DUE"), "Past due");
        assert_eq!(humanize_category("  "), "Unknown");
    }
}
