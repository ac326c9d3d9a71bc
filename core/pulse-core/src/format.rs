//! Human-readable duration strings for completion notifications.

/// Formats whole seconds as `"{s}s"`, `"{m}m {s}s"` / `"{m}m"`, or
/// `"{h}h {m}m"` / `"{h}h"`. Remainders of zero are omitted.
pub fn format_duration(seconds: i64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        let minutes = seconds / 60;
        let secs = seconds % 60;
        if secs > 0 {
            format!("{}m {}s", minutes, secs)
        } else {
            format!("{}m", minutes)
        }
    } else {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        if minutes > 0 {
            format!("{}h {}m", hours, minutes)
        } else {
            format!("{}h", hours)
        }
    }
}
