// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::error::AppError;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format an instant as local wall-clock `HH:MM` in the given timezone.
pub fn format_time_of_day(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}

/// Parse an IANA timezone identifier such as `America/New_York`.
pub fn parse_timezone(name: &str) -> Result<Tz, AppError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| AppError::InvalidTimezone(name.to_string()))
}

/// The span of "today" in some timezone, as whole Unix seconds.
///
/// `start` is local 00:00:00.000 and `end` is local 23:59:59.999 (floored to
/// the second), so on a day without a DST transition `end - start == 86399`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDayWindow {
    pub tz: Tz,
    pub date: NaiveDate,
    pub start: i64,
    pub end: i64,
}

impl LocalDayWindow {
    /// Compute the local day containing `now` in `tz`.
    ///
    /// Independent of the server's own timezone. Callers resolve a fresh
    /// window per request; a window goes stale at local midnight.
    pub fn containing(tz: Tz, now: DateTime<Utc>) -> Result<Self, AppError> {
        let date = now.with_timezone(&tz).date_naive();
        let next = date
            .succ_opt()
            .ok_or_else(|| AppError::BadRequest(format!("Date out of range: {}", date)))?;

        let start = start_of_local_day(tz, date)?;
        let end = start_of_local_day(tz, next)? - Duration::milliseconds(1);

        Ok(Self {
            tz,
            date,
            start: start.timestamp(),
            end: end.timestamp(),
        })
    }

    /// Resolve a window from a timezone identifier.
    pub fn resolve(timezone: &str, now: DateTime<Utc>) -> Result<Self, AppError> {
        Self::containing(parse_timezone(timezone)?, now)
    }

    /// Local midnight as a UTC instant.
    pub fn start_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.start, 0).unwrap_or_default()
    }

    /// Last second of the local day as a UTC instant.
    pub fn end_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.end, 0).unwrap_or_default()
    }

    /// Whether the instant falls inside the window (second resolution).
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let ts = instant.timestamp();
        self.start <= ts && ts <= self.end
    }
}

/// First instant of `date` in `tz`.
///
/// Some zones skip midnight on DST days (the clock jumps 00:00 -> 01:00);
/// there the day starts at the first local time that exists.
fn start_of_local_day(tz: Tz, date: NaiveDate) -> Result<DateTime<Utc>, AppError> {
    let midnight = date.and_time(NaiveTime::MIN);

    let local = match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => (1..=96)
            .map(|quarter| midnight + Duration::minutes(15 * quarter))
            .find_map(|candidate| tz.from_local_datetime(&candidate).earliest()),
    };

    local
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidTimezone(tz.name().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_new_york_window_on_regular_day() {
        // 2024-03-05 15:30 UTC is 10:30 EST
        let now = utc(2024, 3, 5, 15, 30);
        let window = LocalDayWindow::resolve("America/New_York", now).unwrap();

        // 2024-03-05 00:00 EST == 05:00 UTC
        assert_eq!(window.start, utc(2024, 3, 5, 5, 0).timestamp());
        assert_eq!(window.end - window.start, 86399);
        assert!(window.start < now.timestamp() && now.timestamp() < window.end);
        assert_eq!(window.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

        assert_eq!(format_utc_rfc3339(window.start_utc()), "2024-03-05T05:00:00Z");
        assert_eq!(format_utc_rfc3339(window.end_utc()), "2024-03-06T04:59:59Z");
    }

    #[test]
    fn test_window_uses_local_date_not_utc_date() {
        // 2024-03-06 02:00 UTC is still 2024-03-05 in New York
        let now = utc(2024, 3, 6, 2, 0);
        let window = LocalDayWindow::resolve("America/New_York", now).unwrap();

        assert_eq!(window.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert!(window.contains(now));
    }

    #[test]
    fn test_window_on_spring_forward_day_is_short() {
        // 2024-03-10 is 23 hours long in New York
        let now = utc(2024, 3, 10, 18, 0);
        let window = LocalDayWindow::resolve("America/New_York", now).unwrap();

        assert_eq!(window.end - window.start, 23 * 3600 - 1);
        assert!(window.contains(now));
    }

    #[test]
    fn test_window_when_midnight_is_skipped() {
        // Santiago springs forward at 00:00 -> 01:00 on 2024-09-08
        let now = utc(2024, 9, 8, 15, 0);
        let window = LocalDayWindow::resolve("America/Santiago", now).unwrap();

        assert!(window.start < window.end);
        assert!(window.contains(now));
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let err = LocalDayWindow::resolve("Mars/Olympus_Mons", Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::InvalidTimezone(_)));
    }

    #[test]
    fn test_format_time_of_day() {
        let instant = utc(2024, 7, 1, 13, 5);
        assert_eq!(format_time_of_day(instant, chrono_tz::Europe::Berlin), "15:05");
        assert_eq!(format_utc_rfc3339(instant), "2024-07-01T13:05:00Z");
    }
}
