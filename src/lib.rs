// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hours Board: a team leaderboard of today's Toggl Track hours
//!
//! This crate provides the backend API for the shared dashboard display,
//! self-registration of team members, and the admin roster.

pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::UserStore;
use services::{CredentialCipher, LeaderboardService, RosterService, TogglClient};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub leaderboard_service: LeaderboardService,
    pub roster_service: RosterService,
}

impl AppState {
    /// Wire services from configuration, a user store and a credential cipher.
    pub fn new(
        config: Config,
        store: Arc<dyn UserStore>,
        cipher: Arc<dyn CredentialCipher>,
    ) -> Self {
        let toggl = TogglClient::new(config.toggl_api_url.clone());
        let leaderboard_service =
            LeaderboardService::new(toggl.clone(), cipher.clone(), config.fetch_timeout);
        let roster_service = RosterService::new(store, toggl, cipher, config.fetch_timeout);

        Self {
            config,
            leaderboard_service,
            roster_service,
        }
    }
}
