// tasks/mod.rs — Task domain model and field validation.

use chrono::NaiveDate;

/// Date-only format accepted for `due_date` fields.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Minimum accepted `title` length, in characters.
pub const MIN_TITLE_LEN: usize = 3;

/// Closed set of task states. Any state may move to any other; there is no
/// transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// chrono accepts unpadded components ("2025-1-5"), so the parse must also
/// round-trip back to the input string to count as well-formed.
pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, DUE_DATE_FORMAT).ok()?;
    (date.format(DUE_DATE_FORMAT).to_string() == s).then_some(date)
}

pub fn validate_title(title: &str) -> bool {
    title.chars().count() >= MIN_TITLE_LEN
}
