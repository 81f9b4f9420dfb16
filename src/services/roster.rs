// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Roster management: self-registration and admin CRUD.
//!
//! Every credential is checked against Toggl before it is encrypted and
//! stored.

use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use validator::{Validate, ValidationError};

use crate::db::UserStore;
use crate::error::AppError;
use crate::models::user::normalize_email;
use crate::models::TrackedUser;
use crate::services::cipher::{seal_credential, CredentialCipher};
use crate::services::toggl::{TogglClient, TogglCredential, TogglMe};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Self-registration with a Toggl login.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Admin-created user with a Toggl API token.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[validate(custom(function = "not_blank", message = "Team is required"))]
    pub team: String,
    #[validate(custom(function = "not_blank", message = "API token is required"))]
    pub api_token: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "not_blank", message = "Name cannot be blank"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub team: Option<String>,
    pub is_active: Option<bool>,
    /// Rotates the credential when present
    #[validate(custom(function = "not_blank", message = "API token cannot be blank"))]
    pub api_token: Option<String>,
}

/// Credential rotation.
#[derive(Debug, Deserialize, Validate)]
pub struct RotateCredentialRequest {
    #[validate(custom(function = "not_blank", message = "API token is required"))]
    pub api_token: String,
}

fn validate<T: Validate>(request: &T) -> Result<(), AppError> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Roster operations over the user store.
#[derive(Clone)]
pub struct RosterService {
    store: Arc<dyn UserStore>,
    toggl: TogglClient,
    cipher: Arc<dyn CredentialCipher>,
    verify_timeout: Duration,
}

impl RosterService {
    pub fn new(
        store: Arc<dyn UserStore>,
        toggl: TogglClient,
        cipher: Arc<dyn CredentialCipher>,
        verify_timeout: Duration,
    ) -> Self {
        Self {
            store,
            toggl,
            cipher,
            verify_timeout,
        }
    }

    /// Check a credential against `GET /me`.
    async fn verify(&self, credential: &TogglCredential) -> Result<TogglMe, AppError> {
        tokio::time::timeout(self.verify_timeout, self.toggl.verify_credential(credential))
            .await
            .map_err(|_| AppError::UpstreamUnavailable("credential check timed out".to_string()))?
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<&str>) -> Result<(), AppError> {
        match self.store.find_by_email(email).await? {
            Some(existing) if Some(existing.id.as_str()) != owner => Err(AppError::DuplicateEmail),
            _ => Ok(()),
        }
    }

    /// Register a user from their Toggl login.
    ///
    /// A Toggl outage during the check is reported as a bad request.
    pub async fn register(&self, request: RegisterRequest) -> Result<TrackedUser, AppError> {
        validate(&request)?;
        let email = normalize_email(&request.email);

        let credential = TogglCredential::from_login(&email, &request.password);
        let me = self
            .verify(&credential)
            .await
            .inspect_err(|e| {
                tracing::warn!(email = %email, operation = "register", error = %e, "Toggl credential check failed");
            })
            .map_err(|e| match e {
                AppError::UpstreamUnavailable(_) => {
                    AppError::BadRequest("Failed to verify Toggl credentials".to_string())
                }
                other => other,
            })?;
        tracing::info!(email = %email, toggl_id = me.id, "Toggl user verified");

        self.ensure_email_free(&email, None).await?;

        let user = self
            .build_user(
                request.name.trim().to_string(),
                email,
                me.image_url.filter(|url| !url.is_empty()),
                String::new(),
                &credential,
                true,
            )
            .await?;

        self.store.create_user(&user).await?;
        tracing::info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    /// Admin: create a user from a Toggl API token.
    pub async fn create(&self, request: CreateUserRequest) -> Result<TrackedUser, AppError> {
        validate(&request)?;
        let email = normalize_email(&request.email);
        let credential = TogglCredential::from_api_token(&request.api_token);

        self.verify(&credential).await?;
        self.ensure_email_free(&email, None).await?;

        let user = self
            .build_user(
                request.name.trim().to_string(),
                email,
                request.avatar.filter(|a| !a.trim().is_empty()),
                request.team.trim().to_string(),
                &credential,
                request.is_active,
            )
            .await?;

        self.store.create_user(&user).await?;
        tracing::info!(user_id = %user.id, "Admin created user");
        Ok(user)
    }

    async fn build_user(
        &self,
        name: String,
        email: String,
        avatar: Option<String>,
        team: String,
        credential: &TogglCredential,
        is_active: bool,
    ) -> Result<TrackedUser, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let credential_encrypted = seal_credential(self.cipher.as_ref(), &id, credential).await?;
        let now = chrono::Utc::now().to_rfc3339();

        Ok(TrackedUser {
            id,
            name,
            email,
            avatar,
            team,
            credential_encrypted,
            is_active,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub async fn list(&self) -> Result<Vec<TrackedUser>, AppError> {
        self.store.list_users().await
    }

    pub async fn active_users(&self) -> Result<Vec<TrackedUser>, AppError> {
        self.store.list_active_users().await
    }

    pub async fn get(&self, id: &str) -> Result<TrackedUser, AppError> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Admin: apply a partial update.
    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<TrackedUser, AppError> {
        validate(&request)?;
        let mut user = self.get(id).await?;

        if let Some(name) = request.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = request.email {
            let email = normalize_email(&email);
            self.ensure_email_free(&email, Some(id)).await?;
            user.email = email;
        }
        if let Some(avatar) = request.avatar {
            user.avatar = Some(avatar).filter(|a| !a.trim().is_empty());
        }
        if let Some(team) = request.team {
            user.team = team.trim().to_string();
        }
        if let Some(active) = request.is_active {
            user.is_active = active;
        }
        if let Some(token) = request.api_token {
            let credential = TogglCredential::from_api_token(&token);
            self.verify(&credential).await?;
            user.credential_encrypted =
                seal_credential(self.cipher.as_ref(), &user.id, &credential).await?;
        }

        user.updated_at = chrono::Utc::now().to_rfc3339();
        self.store.update_user(&user).await?;
        tracing::info!(user_id = %id, "Updated user");
        Ok(user)
    }

    /// Admin: replace the stored Toggl credential.
    pub async fn rotate_credential(
        &self,
        id: &str,
        request: RotateCredentialRequest,
    ) -> Result<TrackedUser, AppError> {
        validate(&request)?;
        self.update(
            id,
            UpdateUserRequest {
                api_token: Some(request.api_token),
                ..Default::default()
            },
        )
        .await
    }

    /// Admin: flip the active flag.
    pub async fn toggle_active(&self, id: &str) -> Result<TrackedUser, AppError> {
        let user = self.get(id).await?;
        let updated = self.store.set_active(id, !user.is_active).await?;
        tracing::info!(user_id = %id, active = updated.is_active, "Toggled user active flag");
        Ok(updated)
    }

    /// Admin: delete a user permanently.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.store.delete_user(id).await?;
        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }
}
