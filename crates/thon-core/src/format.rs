//! Duration formatting for display.

/// Formats seconds as a stopwatch reading, `HH:MM:SS`.
///
/// Hours widen beyond two digits as needed. Negative values (possible after
/// a backward clock jump) keep their sign: `-00:00:05`.
pub fn format_clock(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{sign}{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats seconds as `Xh Ym`, flooring to whole minutes.
pub fn format_hours_minutes(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let total_minutes = seconds.unsigned_abs() / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    format!("{sign}{hours}h {minutes}m")
}
