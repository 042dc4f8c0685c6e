//! Screen implementations and shared rendering helpers.

pub mod detail;
pub mod list;

use chrono::Duration;

/// Cut a commit subject down to `max` characters, marking the cut with
/// an ellipsis.
pub fn truncate_subject(subject: &str, max: usize) -> String {
    if subject.chars().count() <= max {
        return subject.to_string();
    }
    let kept: String = subject.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Human-readable age of a commit.
pub fn format_age(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    if secs < 60 {
        return "just now".to_string();
    }
    let mins = secs / 60;
    if mins < 60 {
        return pluralize(mins, "min");
    }
    let hours = mins / 60;
    if hours < 24 {
        return pluralize(hours, "hour");
    }
    let days = hours / 24;
    if days < 7 {
        return pluralize(days, "day");
    }
    pluralize(days / 7, "week")
}

fn pluralize(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
