// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public dashboard routes: the leaderboard and per-user stats.

use crate::error::Result;
use crate::models::{LeaderboardRow, UserDayStats};
use crate::time_utils::{format_utc_rfc3339, parse_timezone};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/user-stats/{id}", get(get_user_stats))
}

#[derive(Deserialize)]
struct TimezoneQuery {
    /// IANA timezone; defaults to the configured one
    timezone: Option<String>,
}

impl TimezoneQuery {
    fn resolve(&self, default: Tz) -> Result<Tz> {
        match self.timezone.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => parse_timezone(name),
            _ => Ok(default),
        }
    }
}

/// Leaderboard response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub data: Vec<LeaderboardRow>,
    pub timezone: String,
    pub generated_at: String,
    /// How often the shared display should reload
    pub refresh_interval_minutes: u32,
}

/// Today's hours for every active user, most hours first.
///
/// Users whose hours could not be fetched are left out.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TimezoneQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let tz = params.resolve(state.config.default_timezone)?;
    let users = state.roster_service.active_users().await?;

    tracing::debug!(timezone = %tz.name(), users = users.len(), "Building leaderboard");

    let rows = state.leaderboard_service.leaderboard(&users, tz).await?;

    Ok(Json(LeaderboardResponse {
        success: true,
        data: rows,
        timezone: tz.name().to_string(),
        generated_at: format_utc_rfc3339(chrono::Utc::now()),
        refresh_interval_minutes: state.config.refresh_interval_minutes,
    }))
}

/// Per-user stats response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserStatsResponse {
    pub success: bool,
    pub data: UserDayStats,
}

/// Detailed figures for one user. Inactive users are still reachable here.
async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<TimezoneQuery>,
) -> Result<Json<UserStatsResponse>> {
    let tz = params.resolve(state.config.default_timezone)?;
    let user = state.roster_service.get(&id).await?;

    let data = state.leaderboard_service.user_stats(&user, tz).await?;
    Ok(Json(UserStatsResponse {
        success: true,
        data,
    }))
}
