//! Display helpers for timer views

/// Render seconds as `MM:SS`. Minutes keep counting past 59.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
