use chrono::{DateTime, Utc};

/// Maximum characters of an offer description shown in a notification.
pub const DESCRIPTION_LIMIT: usize = 300;

/// Human readable time left on a promotion: `"2d 5h remaining"`, `"Expired"` or `"Unknown"`.
pub fn remaining_text(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(expiry) = expiry else {
        return "Unknown".to_string();
    };
    let left = expiry - now;
    if left <= chrono::Duration::zero() {
        return "Expired".to_string();
    }
    let days = left.num_days();
    let hours = left.num_hours() - days * 24;
    format!("{days}d {hours}h remaining")
}

/// Truncates on a char boundary, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit.saturating_sub(1)).collect();
    out.push('…');
    out
}
