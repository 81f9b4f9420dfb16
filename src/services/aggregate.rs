// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reduce raw Toggl entries into today's figures.
//!
//! All functions here are pure: "now" is always passed in.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::format::format_seconds_to_hours_minutes;
use crate::models::{DailyAggregate, DailySession, PresenceStatus, TimeEntry};
use crate::time_utils::{format_time_of_day, LocalDayWindow};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Keep only live entries that started inside `window`.
///
/// Toggl may still return entries deleted on its side, or ones that started
/// on another day; neither counts toward today.
pub fn entries_for_day(entries: Vec<TimeEntry>, window: &LocalDayWindow) -> Vec<TimeEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.server_deleted_at.is_none() && window.contains(entry.start))
        .collect()
}

/// Seconds an entry contributes as of `now`.
///
/// Closed entries count `|duration|`. Running entries (no stop, or Toggl's
/// negative-duration marker) count the time elapsed since `start`.
fn entry_seconds(entry: &TimeEntry, now: DateTime<Utc>) -> f64 {
    if entry.is_running() {
        let elapsed_ms = (now - entry.start).num_milliseconds();
        (elapsed_ms as f64 / 1000.0).max(0.0)
    } else {
        entry.duration.unsigned_abs() as f64
    }
}

/// Total tracked seconds across `entries` as of `now`.
///
/// Several running entries are each counted against `now`; they are not
/// merged even if they overlap.
pub fn total_seconds(entries: &[TimeEntry], now: DateTime<Utc>) -> f64 {
    entries.iter().map(|entry| entry_seconds(entry, now)).sum()
}

/// Convert seconds to hours rounded to one decimal place.
pub fn seconds_to_hours(seconds: f64) -> f64 {
    (seconds / SECONDS_PER_HOUR * 10.0).round() / 10.0
}

/// `Online` if any entry has no stop time, otherwise `Away`.
pub fn derive_status(entries: &[TimeEntry]) -> PresenceStatus {
    if entries.iter().any(|entry| entry.stop.is_none()) {
        PresenceStatus::Online
    } else {
        PresenceStatus::Away
    }
}

/// Hours, "H:MM" and status for one user's entries.
pub fn daily_aggregate(entries: &[TimeEntry], now: DateTime<Utc>) -> DailyAggregate {
    let seconds = total_seconds(entries, now);
    DailyAggregate {
        hours_today: seconds_to_hours(seconds),
        formatted: format_seconds_to_hours_minutes(seconds),
        status: derive_status(entries),
    }
}

/// Entries rendered for the per-user page, ordered by start time.
pub fn daily_sessions(entries: &[TimeEntry], tz: Tz, now: DateTime<Utc>) -> Vec<DailySession> {
    let mut sorted: Vec<&TimeEntry> = entries.iter().collect();
    sorted.sort_by_key(|entry| entry.start);

    sorted
        .into_iter()
        .map(|entry| DailySession {
            name: entry
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "(no description)".to_string()),
            start_time: format_time_of_day(entry.start, tz),
            end_time: entry
                .stop
                .filter(|_| !entry.is_running())
                .map(|stop| format_time_of_day(stop, tz)),
            duration: seconds_to_hours(entry_seconds(entry, now)),
        })
        .collect()
}
