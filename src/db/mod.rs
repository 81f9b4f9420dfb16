// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! `UserStore` is implemented by Firestore for deployments and by an
//! in-memory map for local runs and tests.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::TrackedUser;
use futures_util::future::BoxFuture;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Persistence for the roster of tracked users.
///
/// Each user row is independent; no operation spans several users.
pub trait UserStore: Send + Sync {
    /// All users, in a stable order (by creation time).
    fn list_users(&self) -> BoxFuture<'_, Result<Vec<TrackedUser>, AppError>>;

    /// Users with `is_active` set, in the same order as `list_users`.
    fn list_active_users(&self) -> BoxFuture<'_, Result<Vec<TrackedUser>, AppError>> {
        Box::pin(async move {
            Ok(self
                .list_users()
                .await?
                .into_iter()
                .filter(|user| user.is_active)
                .collect())
        })
    }

    fn get_user<'a>(&'a self, id: &'a str)
        -> BoxFuture<'a, Result<Option<TrackedUser>, AppError>>;

    /// Look up by normalised email.
    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<TrackedUser>, AppError>>;

    /// Insert a new user. Fails with `DuplicateEmail` if the email is taken.
    fn create_user<'a>(&'a self, user: &'a TrackedUser) -> BoxFuture<'a, Result<(), AppError>>;

    /// Replace an existing user. Fails with `NotFound` if absent.
    fn update_user<'a>(&'a self, user: &'a TrackedUser) -> BoxFuture<'a, Result<(), AppError>>;

    /// Set the active flag and return the updated user.
    fn set_active<'a>(
        &'a self,
        id: &'a str,
        active: bool,
    ) -> BoxFuture<'a, Result<TrackedUser, AppError>>;

    /// Remove a user. Fails with `NotFound` if absent.
    fn delete_user<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<(), AppError>>;
}
