// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Display formatting for durations.
//!
//! These are leaf functions for the dashboard: NaN or negative input maps to
//! the zero-duration string instead of an error.

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Split decimal hours into whole hours and rounded minutes (0..=60).
fn split_hours(hours: f64) -> (u64, u64) {
    let whole = hours.floor();
    let minutes = ((hours - whole) * 60.0).round();
    (whole as u64, minutes as u64)
}

fn is_degenerate(value: f64) -> bool {
    value.is_nan() || value < 0.0
}

/// Format decimal hours as `H:MM` (8.45 -> "8:27").
pub fn format_hours_to_hours_minutes(hours: f64) -> String {
    if is_degenerate(hours) {
        return "0:00".to_string();
    }

    let (whole, minutes) = split_hours(hours);
    if minutes == 60 {
        return format!("{}:00", whole + 1);
    }

    format!("{}:{:02}", whole, minutes)
}

/// Format a number of seconds as `H:MM`.
pub fn format_seconds_to_hours_minutes(seconds: f64) -> String {
    if is_degenerate(seconds) {
        return "0:00".to_string();
    }
    format_hours_to_hours_minutes(seconds / SECONDS_PER_HOUR)
}

/// Format decimal hours for people: "45m", "2h", "2h 15m".
pub fn format_hours_human_readable(hours: f64) -> String {
    if is_degenerate(hours) {
        return "0m".to_string();
    }

    let (mut whole, mut minutes) = split_hours(hours);
    if minutes == 60 {
        whole += 1;
        minutes = 0;
    }

    if whole == 0 {
        return format!("{}m", minutes);
    }
    if minutes == 0 {
        return format!("{}h", whole);
    }
    format!("{}h {}m", whole, minutes)
}

/// Parse `H:MM` back into decimal hours. Anything unparseable is 0.
///
/// Only the first two `:` fields are read, so `H:MM:SS` ignores the seconds.
pub fn hours_minutes_to_decimal(value: &str) -> f64 {
    let mut fields = value.split(':');
    let (Some(hours), Some(minutes)) = (fields.next(), fields.next()) else {
        return 0.0;
    };

    match (hours.trim().parse::<u32>(), minutes.trim().parse::<u32>()) {
        (Ok(h), Ok(m)) => f64::from(h) + f64::from(m) / 60.0,
        _ => 0.0,
    }
}

/// Add two `H:MM` strings.
pub fn add_times(a: &str, b: &str) -> String {
    format_hours_to_hours_minutes(hours_minutes_to_decimal(a) + hours_minutes_to_decimal(b))
}

/// Format milliseconds as "2h 15m" (or "2h 15m 30s" with seconds).
pub fn format_duration_ms(ms: f64, include_seconds: bool) -> String {
    if is_degenerate(ms) {
        return "0m".to_string();
    }

    let total_seconds = (ms / 1000.0).floor() as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 || hours == 0 {
        parts.push(format!("{}m", minutes));
    }
    if include_seconds && seconds > 0 {
        parts.push(format!("{}s", seconds));
    }

    parts.join(" ")
}

/// Progress label shown next to a leaderboard row ("+3.5").
pub fn progress_label(hours: f64) -> String {
    format!("+{:.1}", hours.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0.0, "0:00")]
    #[case::nan(f64::NAN, "0:00")]
    #[case::negative(-1.0, "0:00")]
    #[case::decimal(8.45, "8:27")]
    #[case::half(1.5, "1:30")]
    #[case::short(0.25, "0:15")]
    #[case::carry(1.9995, "2:00")]
    #[case::pads_minutes(3.1, "3:06")]
    fn test_format_hours_to_hours_minutes(#[case] hours: f64, #[case] expected: &str) {
        assert_eq!(format_hours_to_hours_minutes(hours), expected);
    }

    #[rstest]
    #[case::zero(0.0, "0m")]
    #[case::nan(f64::NAN, "0m")]
    #[case::whole(1.0, "1h")]
    #[case::mixed(1.5, "1h 30m")]
    #[case::minutes_only(0.75, "45m")]
    #[case::carry(2.9999, "3h")]
    fn test_format_hours_human_readable(#[case] hours: f64, #[case] expected: &str) {
        assert_eq!(format_hours_human_readable(hours), expected);
    }

    #[test]
    fn test_format_seconds_to_hours_minutes() {
        assert_eq!(format_seconds_to_hours_minutes(12_600.0), "3:30");
        assert_eq!(format_seconds_to_hours_minutes(-5.0), "0:00");
    }

    #[test]
    fn test_hours_minutes_to_decimal() {
        assert_eq!(hours_minutes_to_decimal("2:30"), 2.5);
        assert_eq!(hours_minutes_to_decimal("2:30:00"), 2.5);
        assert_eq!(hours_minutes_to_decimal("1:15:59"), 1.25);
        assert_eq!(hours_minutes_to_decimal("230"), 0.0);
        assert_eq!(hours_minutes_to_decimal("x:30"), 0.0);
        assert_eq!(hours_minutes_to_decimal(""), 0.0);
    }

    #[test]
    fn test_add_times_carries_minutes() {
        assert_eq!(add_times("1:45", "0:30"), "2:15");
        assert_eq!(add_times("bogus", "0:30"), "0:30");
    }

    #[rstest]
    #[case::negative(-1.0, false, "0m")]
    #[case::zero(0.0, false, "0m")]
    #[case::hours_and_minutes(8_100_000.0, false, "2h 15m")]
    #[case::exact_hours(7_200_000.0, false, "2h")]
    #[case::with_seconds(8_130_000.0, true, "2h 15m 30s")]
    #[case::seconds_hidden(8_130_000.0, false, "2h 15m")]
    fn test_format_duration_ms(#[case] ms: f64, #[case] secs: bool, #[case] expected: &str) {
        assert_eq!(format_duration_ms(ms, secs), expected);
    }

    #[test]
    fn test_progress_label() {
        assert_eq!(progress_label(3.5), "+3.5");
        assert_eq!(progress_label(2.0), "+2.0");
        assert_eq!(progress_label(0.0), "+0.0");
    }
}
