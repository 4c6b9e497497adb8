//! Helper functions and utilities
//!
//! Small text and formatting helpers shared by the services.

use chrono::{DateTime, Duration, Utc};

use crate::utils::errors::{PromoFlowError, Result};

/// Marker appended to shortened text
pub const ELLIPSIS: &str = "...";

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// `now` minus `days` whole days. Windows too large for chrono are an error,
/// never a panic.
pub fn days_before(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    Duration::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| PromoFlowError::Validation(format!("Day window out of range: {}", days)))
}

/// Keep the first `max_chars` characters of `text`, appending an ellipsis when
/// anything was cut. Counts characters, not bytes.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], ELLIPSIS),
    }
}

/// Trimmed text, or `None` when nothing but whitespace remains
pub fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join labels as "a, b and c"
pub fn human_list(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
