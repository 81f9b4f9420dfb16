// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod leaderboard;
pub mod time_entry;
pub mod user;

pub use leaderboard::{DailyAggregate, DailySession, LeaderboardRow, PresenceStatus, UserDayStats};
pub use time_entry::TimeEntry;
pub use user::{TrackedUser, UserProfile};
