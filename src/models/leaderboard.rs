// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Derived per-day figures. Computed per request, never persisted.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Coarse presence indicator shown next to each user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// A timer is running right now
    Online,
    /// No timer running (with or without entries today)
    Away,
    /// Reserved; never derived from time entries
    Offline,
}

/// One user's totals for the local day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    /// Hours today, rounded to one decimal place
    pub hours_today: f64,
    /// Same duration as "H:MM"
    pub formatted: String,
    pub status: PresenceStatus,
}

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardRow {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub team: String,
    pub status: PresenceStatus,
    pub hours_today: f64,
    pub formatted_hours: String,
    /// e.g. "+3.5"
    pub progress: String,
}

/// A single time entry as shown on the per-user page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailySession {
    pub name: String,
    /// Local "HH:MM"
    pub start_time: String,
    /// Local "HH:MM", `None` while running
    pub end_time: Option<String>,
    /// Hours
    pub duration: f64,
}

/// Detailed stats for one user.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserDayStats {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub team: String,
    pub timezone: String,
    /// Local date ("YYYY-MM-DD")
    pub date: String,
    pub status: PresenceStatus,
    pub hours_today: f64,
    pub formatted_hours: String,
    pub human_readable: String,
    pub entry_count: usize,
    pub sessions: Vec<DailySession>,
}
