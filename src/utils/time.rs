//! Time formatting helpers for playback positions

/// Format a playback position in seconds as `m:ss`
///
/// Fractions are truncated; negative or non-finite input renders as `0:00`.
/// Minutes are not wrapped into hours, matching how players label long videos.
///
/// ```rust
/// use live_commentary::utils::format_timestamp;
///
/// assert_eq!(format_timestamp(75.9), "1:15");
/// ```
pub fn format_timestamp(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
