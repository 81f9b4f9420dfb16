// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregate;
pub mod cipher;
pub mod kms;
pub mod leaderboard;
pub mod roster;
pub mod toggl;

pub use cipher::{CredentialCipher, LocalCipher};
pub use kms::KmsCipher;
pub use leaderboard::LeaderboardService;
pub use roster::RosterService;
pub use toggl::{TogglClient, TogglCredential};
