use std::time::Duration;

/// Shortens `s` to at most `max_chars` characters, used when echoing response bodies into errors
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_owned(),
        Some((idx, _)) => format!("{}...", &s[..idx]),
    }
}

/// Formats a runtime given in minutes, e.g. `2h 28m`
pub fn format_runtime(minutes: u32) -> String {
    let duration = Duration::from_secs(u64::from(minutes) * 60);
    humantime::format_duration(duration).to_string()
}
