// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Users live in the `users` collection, keyed by user ID.

use futures_util::future::BoxFuture;

use crate::db::{collections, UserStore};
use crate::error::AppError;
use crate::models::TrackedUser;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline Firestore client.
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    async fn fetch_users(&self) -> Result<Vec<TrackedUser>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .order_by([("created_at", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn fetch_active_users(&self) -> Result<Vec<TrackedUser>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.for_all([q.field("is_active").eq(true)]))
            .order_by([("created_at", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn fetch_user(&self, id: &str) -> Result<Option<TrackedUser>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<TrackedUser>, AppError> {
        let users: Vec<TrackedUser> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.for_all([q.field("email").eq(email)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    async fn insert_user(&self, user: &TrackedUser) -> Result<(), AppError> {
        if self.fetch_user_by_email(&user.email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn replace_user(&self, user: &TrackedUser) -> Result<(), AppError> {
        if self.fetch_user(&user.id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user.id)));
        }

        if let Some(other) = self.fetch_user_by_email(&user.email).await? {
            if other.id != user.id {
                return Err(AppError::DuplicateEmail);
            }
        }

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn update_active(&self, id: &str, active: bool) -> Result<TrackedUser, AppError> {
        let mut user = self
            .fetch_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        user.is_active = active;
        user.updated_at = chrono::Utc::now().to_rfc3339();

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(id)
            .object(&user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(user)
    }

    async fn remove_user(&self, id: &str) -> Result<(), AppError> {
        if self.fetch_user(id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(user_id = id, "Deleted user document");
        Ok(())
    }
}

impl UserStore for FirestoreDb {
    fn list_users(&self) -> BoxFuture<'_, Result<Vec<TrackedUser>, AppError>> {
        Box::pin(self.fetch_users())
    }

    fn list_active_users(&self) -> BoxFuture<'_, Result<Vec<TrackedUser>, AppError>> {
        Box::pin(self.fetch_active_users())
    }

    fn get_user<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<TrackedUser>, AppError>> {
        Box::pin(self.fetch_user(id))
    }

    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<TrackedUser>, AppError>> {
        Box::pin(self.fetch_user_by_email(email))
    }

    fn create_user<'a>(&'a self, user: &'a TrackedUser) -> BoxFuture<'a, Result<(), AppError>> {
        Box::pin(self.insert_user(user))
    }

    fn update_user<'a>(&'a self, user: &'a TrackedUser) -> BoxFuture<'a, Result<(), AppError>> {
        Box::pin(self.replace_user(user))
    }

    fn set_active<'a>(
        &'a self,
        id: &'a str,
        active: bool,
    ) -> BoxFuture<'a, Result<TrackedUser, AppError>> {
        Box::pin(self.update_active(id, active))
    }

    fn delete_user<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<(), AppError>> {
        Box::pin(self.remove_user(id))
    }
}
