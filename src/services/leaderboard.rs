// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user daily figures and the leaderboard built from them.
//!
//! Each user is computed independently: decrypt the credential, fetch today's
//! entries with a timeout, reduce. On the leaderboard path a failure for one
//! user drops that user's row; it never fails the whole board.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;
use crate::format::{format_hours_human_readable, progress_label};
use crate::models::{LeaderboardRow, TimeEntry, TrackedUser, UserDayStats};
use crate::services::aggregate::{daily_aggregate, daily_sessions, entries_for_day};
use crate::services::cipher::{open_credential, CredentialCipher};
use crate::services::toggl::TogglClient;
use crate::time_utils::LocalDayWindow;

/// Builds leaderboard rows and per-user stats.
#[derive(Clone)]
pub struct LeaderboardService {
    toggl: TogglClient,
    cipher: Arc<dyn CredentialCipher>,
    fetch_timeout: Duration,
}

impl LeaderboardService {
    pub fn new(
        toggl: TogglClient,
        cipher: Arc<dyn CredentialCipher>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            toggl,
            cipher,
            fetch_timeout,
        }
    }

    /// Decrypt the user's credential and fetch the live entries that started
    /// inside `window`.
    ///
    /// Decryption and the fetch share one timeout.
    pub async fn entries_for(
        &self,
        user: &TrackedUser,
        window: &LocalDayWindow,
    ) -> Result<Vec<TimeEntry>, AppError> {
        let fetch = async {
            let credential =
                open_credential(self.cipher.as_ref(), &user.id, &user.credential_encrypted)
                    .await?;
            self.toggl.time_entries(&credential, window).await
        };

        let entries = tokio::time::timeout(self.fetch_timeout, fetch)
            .await
            .map_err(|_| {
                AppError::UpstreamUnavailable(format!(
                    "time entries request timed out after {}s",
                    self.fetch_timeout.as_secs_f64()
                ))
            })??;

        Ok(entries_for_day(entries, window))
    }

    /// One leaderboard row, or `None` if anything about this user failed.
    pub async fn user_row(
        &self,
        user: &TrackedUser,
        window: &LocalDayWindow,
        now: DateTime<Utc>,
    ) -> Option<LeaderboardRow> {
        let entries = match self.entries_for(user, window).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    user_id = %user.id,
                    operation = "leaderboard_row",
                    error = %e,
                    "Skipping user on leaderboard"
                );
                return None;
            }
        };

        let aggregate = daily_aggregate(&entries, now);
        tracing::debug!(
            user_id = %user.id,
            entries = entries.len(),
            hours = aggregate.hours_today,
            "Computed daily aggregate"
        );

        Some(LeaderboardRow {
            id: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            team: user.team.clone(),
            status: aggregate.status,
            hours_today: aggregate.hours_today,
            formatted_hours: aggregate.formatted,
            progress: progress_label(aggregate.hours_today),
        })
    }

    /// Rows for `users` inside `window`, sorted by hours descending.
    ///
    /// Fetches run concurrently on the current task; the sort happens after
    /// all of them settle.
    pub async fn leaderboard_at(
        &self,
        users: &[TrackedUser],
        window: &LocalDayWindow,
        now: DateTime<Utc>,
    ) -> Vec<LeaderboardRow> {
        let results = join_all(users.iter().map(|user| self.user_row(user, window, now))).await;

        let mut rows: Vec<LeaderboardRow> = results.into_iter().flatten().collect();
        sort_rows(&mut rows);

        if rows.len() < users.len() {
            tracing::info!(
                requested = users.len(),
                returned = rows.len(),
                "Leaderboard built with missing users"
            );
        }

        rows
    }

    /// Leaderboard for "today" in `tz`.
    pub async fn leaderboard(
        &self,
        users: &[TrackedUser],
        tz: Tz,
    ) -> Result<Vec<LeaderboardRow>, AppError> {
        let now = Utc::now();
        let window = LocalDayWindow::containing(tz, now)?;
        Ok(self.leaderboard_at(users, &window, now).await)
    }

    /// Detailed figures for one user. Errors are returned, not absorbed.
    pub async fn user_stats_at(
        &self,
        user: &TrackedUser,
        window: &LocalDayWindow,
        now: DateTime<Utc>,
    ) -> Result<UserDayStats, AppError> {
        let entries = self.entries_for(user, window).await.inspect_err(|e| {
            tracing::warn!(
                user_id = %user.id,
                operation = "user_stats",
                error = %e,
                "Failed to fetch time entries"
            );
        })?;

        let aggregate = daily_aggregate(&entries, now);
        Ok(UserDayStats {
            id: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            team: user.team.clone(),
            timezone: window.tz.name().to_string(),
            date: window.date.format("%Y-%m-%d").to_string(),
            status: aggregate.status,
            hours_today: aggregate.hours_today,
            formatted_hours: aggregate.formatted,
            human_readable: format_hours_human_readable(aggregate.hours_today),
            entry_count: entries.len(),
            sessions: daily_sessions(&entries, window.tz, now),
        })
    }

    /// Detailed figures for one user for "today" in `tz`.
    pub async fn user_stats(&self, user: &TrackedUser, tz: Tz) -> Result<UserDayStats, AppError> {
        let now = Utc::now();
        let window = LocalDayWindow::containing(tz, now)?;
        self.user_stats_at(user, &window, now).await
    }
}

/// Hours descending; equal hours keep their input order.
pub fn sort_rows(rows: &mut [LeaderboardRow]) {
    rows.sort_by(|a, b| b.hours_today.total_cmp(&a.hours_today));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PresenceStatus;

    fn row(id: &str, hours: f64) -> LeaderboardRow {
        LeaderboardRow {
            id: id.to_string(),
            name: id.to_string(),
            avatar: None,
            team: String::new(),
            status: PresenceStatus::Away,
            hours_today: hours,
            formatted_hours: String::new(),
            progress: progress_label(hours),
        }
    }

    /// A cipher whose decrypt never completes.
    struct StalledCipher;

    impl CredentialCipher for StalledCipher {
        fn encrypt<'a>(
            &'a self,
            _user_id: &'a str,
            plaintext: &'a str,
        ) -> futures_util::future::BoxFuture<'a, Result<String, AppError>> {
            Box::pin(async move { Ok(plaintext.to_string()) })
        }

        fn decrypt<'a>(
            &'a self,
            _user_id: &'a str,
            _blob: &'a str,
        ) -> futures_util::future::BoxFuture<'a, Result<String, AppError>> {
            Box::pin(std::future::pending())
        }
    }

    fn tracked_user(id: &str) -> TrackedUser {
        TrackedUser {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{}@example.com", id),
            avatar: None,
            team: String::new(),
            credential_encrypted: "blob".to_string(),
            is_active: true,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_stalled_decrypt_is_bounded_by_fetch_timeout() {
        let service = LeaderboardService::new(
            TogglClient::new("http://127.0.0.1:9"),
            Arc::new(StalledCipher),
            Duration::from_millis(50),
        );
        let now = Utc::now();
        let window = LocalDayWindow::containing(chrono_tz::UTC, now).unwrap();
        let user = tracked_user("slow");

        let err = tokio::time::timeout(Duration::from_secs(5), service.entries_for(&user, &window))
            .await
            .expect("decrypt should be cut off by the fetch timeout")
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));

        let rows = tokio::time::timeout(
            Duration::from_secs(5),
            service.leaderboard_at(&[user], &window, now),
        )
        .await
        .expect("leaderboard should not wait on a stalled decrypt");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_sort_rows_descending_and_stable() {
        let mut rows = vec![
            row("a", 1.0),
            row("b", 3.5),
            row("c", 2.0),
            row("d", 3.5),
            row("e", 0.0),
        ];
        sort_rows(&mut rows);

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c", "a", "e"]);
    }
}
