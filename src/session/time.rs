use std::time::Duration;

/// Format a position as `m:ss`, e.g. `1:05`. Minutes are not padded and
/// keep counting past an hour.
pub fn format_time(d: Duration) -> String {
    let total_secs = d.as_secs();
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
