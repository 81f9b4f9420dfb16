// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory user store for local development and tests.

use dashmap::DashMap;
use futures_util::future::BoxFuture;
use std::sync::Arc;

use crate::db::UserStore;
use crate::error::AppError;
use crate::models::TrackedUser;

/// `UserStore` over a concurrent map keyed by user ID.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<String, TrackedUser>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_users(&self) -> Vec<TrackedUser> {
        let mut users: Vec<TrackedUser> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        users
    }
}

impl UserStore for MemoryStore {
    fn list_users(&self) -> BoxFuture<'_, Result<Vec<TrackedUser>, AppError>> {
        Box::pin(async move { Ok(self.sorted_users()) })
    }

    fn get_user<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<TrackedUser>, AppError>> {
        Box::pin(async move { Ok(self.users.get(id).map(|e| e.value().clone())) })
    }

    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<TrackedUser>, AppError>> {
        Box::pin(async move {
            Ok(self
                .users
                .iter()
                .find(|e| e.value().email == email)
                .map(|e| e.value().clone()))
        })
    }

    fn create_user<'a>(&'a self, user: &'a TrackedUser) -> BoxFuture<'a, Result<(), AppError>> {
        Box::pin(async move {
            if self.users.iter().any(|e| e.value().email == user.email) {
                return Err(AppError::DuplicateEmail);
            }
            self.users.insert(user.id.clone(), user.clone());
            Ok(())
        })
    }

    fn update_user<'a>(&'a self, user: &'a TrackedUser) -> BoxFuture<'a, Result<(), AppError>> {
        Box::pin(async move {
            let taken = self
                .users
                .iter()
                .any(|e| e.value().email == user.email && e.key() != &user.id);
            if taken {
                return Err(AppError::DuplicateEmail);
            }

            match self.users.get_mut(&user.id) {
                Some(mut existing) => {
                    *existing = user.clone();
                    Ok(())
                }
                None => Err(AppError::NotFound(format!("User {} not found", user.id))),
            }
        })
    }

    fn set_active<'a>(
        &'a self,
        id: &'a str,
        active: bool,
    ) -> BoxFuture<'a, Result<TrackedUser, AppError>> {
        Box::pin(async move {
            let mut user = self
                .users
                .get_mut(id)
                .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
            user.is_active = active;
            user.updated_at = chrono::Utc::now().to_rfc3339();
            Ok(user.clone())
        })
    }

    fn delete_user<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<(), AppError>> {
        Box::pin(async move {
            self.users
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
        })
    }
}
