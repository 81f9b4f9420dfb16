// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin session endpoints and roster management.
//!
//! Session endpoints are public; every `/api/admin/users` route sits behind
//! `require_admin` (applied in routes/mod.rs).

use crate::error::{AppError, Result};
use crate::middleware::auth::{
    admin_session, create_admin_token, verify_admin_token, AdminSession, ADMIN_COOKIE,
    SESSION_TTL_SECS,
};
use crate::models::UserProfile;
use crate::services::roster::{CreateUserRequest, RotateCredentialRequest, UpdateUserRequest};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Login, logout and session check.
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/auth", post(login))
        .route("/api/admin/auth/logout", post(logout))
        .route("/api/admin/check-auth", get(check_auth))
}

/// Roster CRUD. Requires an admin session.
pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users", get(list_users).post(create_user))
        .route(
            "/api/admin/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/admin/users/{id}/toggle-active", post(toggle_active))
        .route("/api/admin/users/{id}/credential", put(rotate_credential))
}

// ─── Session ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub authenticated: bool,
    /// Session expiry (RFC 3339), when authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl AuthResponse {
    fn for_session(session: Option<&AdminSession>) -> Self {
        Self {
            authenticated: session.is_some(),
            expires_at: session
                .and_then(|s| chrono::DateTime::from_timestamp(s.expires_at as i64, 0))
                .map(format_utc_rfc3339),
        }
    }
}

fn session_cookie(value: String, max_age: time::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((ADMIN_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// Check the shared admin password and start a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let expected = state.config.admin_password.as_bytes();
    let matches: bool = request.password.as_bytes().ct_eq(expected).into();

    if request.password.is_empty() || !matches {
        tracing::warn!("Admin login failed");
        return Err(AppError::Unauthorized);
    }

    let token = create_admin_token(&state.config.session_signing_key)?;
    let session = verify_admin_token(&token, &state.config.session_signing_key);
    let cookie = session_cookie(
        token,
        time::Duration::seconds(SESSION_TTL_SECS as i64),
        state.config.secure_cookies(),
    );

    tracing::info!("Admin session started");
    Ok((
        jar.add(cookie),
        Json(AuthResponse::for_session(session.as_ref())),
    ))
}

/// End the session by expiring the cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let cookie = session_cookie(
        String::new(),
        time::Duration::ZERO,
        state.config.secure_cookies(),
    );
    (jar.add(cookie), StatusCode::NO_CONTENT)
}

/// Whether the request carries a valid admin session.
async fn check_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (StatusCode, Json<AuthResponse>) {
    let session = admin_session(&jar, &state.config.session_signing_key);
    let status = if session.is_some() {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(AuthResponse::for_session(session.as_ref())))
}

// ─── Users ───────────────────────────────────────────────────

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserProfile>>> {
    let users = state.roster_service.list().await?;
    Ok(Json(users.iter().map(|u| u.profile()).collect()))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let user = state.roster_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(user.profile())))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>> {
    let user = state.roster_service.get(&id).await?;
    Ok(Json(user.profile()))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserProfile>> {
    let user = state.roster_service.update(&id, request).await?;
    Ok(Json(user.profile()))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.roster_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_active(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>> {
    let user = state.roster_service.toggle_active(&id).await?;
    Ok(Json(user.profile()))
}

/// Replace the stored Toggl credential after verifying the new token.
async fn rotate_credential(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<RotateCredentialRequest>,
) -> Result<Json<UserProfile>> {
    let user = state.roster_service.rotate_credential(&id, request).await?;
    Ok(Json(user.profile()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), time::Duration::hours(24), true);
        let rendered = cookie.to_string();

        assert!(rendered.starts_with("hours_admin_session=tok"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Strict"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Max-Age=86400"));
        assert!(rendered.contains("Path=/"));
    }

    #[test]
    fn test_insecure_cookie_for_http_frontend() {
        let cookie = session_cookie(String::new(), time::Duration::ZERO, false);
        let rendered = cookie.to_string();
        assert!(!rendered.contains("Secure"));
        assert!(rendered.contains("Max-Age=0"));
    }
}
