// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Toggl Track API client.
//!
//! Handles:
//! - Credential verification (`GET /me`)
//! - Time entries started inside a window (`GET /me/time_entries?start_date=&end_date=`)
//!
//! Every call is single-attempt; callers bound it with a timeout.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::TimeEntry;
use crate::time_utils::{format_utc_rfc3339, LocalDayWindow};

/// Basic-auth secret for one Toggl account.
///
/// Stored form is `base64("<user>:<password>")`, the value that follows
/// `Basic ` in the Authorization header.
#[derive(Clone, PartialEq, Eq)]
pub struct TogglCredential(String);

impl TogglCredential {
    /// Credential from a Toggl login (email + password).
    pub fn from_login(email: &str, password: &str) -> Self {
        Self(BASE64.encode(format!("{}:{}", email, password)))
    }

    /// Credential from a Toggl API token.
    pub fn from_api_token(token: &str) -> Self {
        Self::from_login(token.trim(), "api_token")
    }

    /// Rebuild from the decrypted stored form.
    pub fn from_stored(secret: String) -> Self {
        Self(secret)
    }

    /// Stored form, to be encrypted at rest.
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn authorization(&self) -> String {
        format!("Basic {}", self.0)
    }
}

impl std::fmt::Debug for TogglCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TogglCredential(<redacted>)")
    }
}

/// Profile returned by `GET /me`.
#[derive(Debug, Clone, Deserialize)]
pub struct TogglMe {
    pub id: u64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Toggl API client.
#[derive(Clone)]
pub struct TogglClient {
    http: reqwest::Client,
    base_url: String,
}

impl TogglClient {
    /// Create a client against `base_url` (e.g. `https://api.track.toggl.com/api/v9`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Check a credential by fetching the account profile.
    pub async fn verify_credential(&self, credential: &TogglCredential) -> Result<TogglMe, AppError> {
        let url = format!("{}/me", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, credential.authorization())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Fetch the account's time entries that started inside `window`.
    pub async fn time_entries(
        &self,
        credential: &TogglCredential,
        window: &LocalDayWindow,
    ) -> Result<Vec<TimeEntry>, AppError> {
        let url = format!("{}/me/time_entries", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, credential.authorization())
            .header(CONTENT_TYPE, "application/json")
            .query(&[
                ("start_date", format_utc_rfc3339(window.start_utc())),
                ("end_date", format_utc_rfc3339(window.end_utc())),
            ])
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(AppError::InvalidCredential);
            }

            if status.as_u16() == 429 {
                tracing::warn!("Toggl rate limit hit (429)");
            }

            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamUnavailable(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("JSON parse error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_from_login_is_basic_auth_value() {
        let credential = TogglCredential::from_login("a@b.c", "pw");
        assert_eq!(credential.expose(), BASE64.encode("a@b.c:pw"));
        assert_eq!(credential.authorization(), format!("Basic {}", BASE64.encode("a@b.c:pw")));
    }

    #[test]
    fn test_credential_from_api_token() {
        let credential = TogglCredential::from_api_token(" abc123 ");
        assert_eq!(credential.expose(), BASE64.encode("abc123:api_token"));
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = TogglCredential::from_login("a@b.c", "hunter2");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains(credential.expose()));
        assert!(debug.contains("redacted"));
    }
}
