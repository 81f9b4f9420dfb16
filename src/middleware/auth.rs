// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin session tokens and the middleware that enforces them.
//!
//! A successful password check yields an HS256 JWT carried in an HttpOnly
//! cookie. Every admin route verifies its signature and expiry; the mere
//! presence of the cookie grants nothing.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Admin session cookie name.
pub const ADMIN_COOKIE: &str = "hours_admin_session";

/// Session lifetime in seconds (24 hours).
pub const SESSION_TTL_SECS: usize = 24 * 60 * 60;

const ADMIN_SUBJECT: &str = "admin";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (always "admin")
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// A verified admin session.
#[derive(Debug, Clone)]
pub struct AdminSession {
    /// Expiration time (Unix timestamp)
    pub expires_at: usize,
}

/// Verify an admin session token.
pub fn verify_admin_token(token: &str, signing_key: &[u8]) -> Option<AdminSession> {
    let key = DecodingKey::from_secret(signing_key);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(token, &key, &validation).ok()?;
    if data.claims.sub != ADMIN_SUBJECT {
        return None;
    }

    Some(AdminSession {
        expires_at: data.claims.exp,
    })
}

/// Verify the admin cookie in `jar`, if any.
pub fn admin_session(jar: &CookieJar, signing_key: &[u8]) -> Option<AdminSession> {
    jar.get(ADMIN_COOKIE)
        .and_then(|cookie| verify_admin_token(cookie.value(), signing_key))
}

/// Middleware that requires a valid admin session.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if admin_session(&jar, &state.config.session_signing_key).is_none() {
        tracing::warn!(path = %request.uri().path(), "Rejected admin request without valid session");
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}

/// Create a signed admin session token.
pub fn create_admin_token(signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: ADMIN_SUBJECT.to_string(),
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
