// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and handed to the auth, credential and aggregation
//! components through `AppState`. Nothing below this module reads the
//! environment directly.

use chrono_tz::Tz;
use std::env;
use std::time::Duration;

/// Default Toggl Track API base URL.
pub const DEFAULT_TOGGL_API_URL: &str = "https://api.track.toggl.com/api/v9";

/// Minimum length of the session signing key in bytes.
const MIN_SIGNING_KEY_LEN: usize = 32;

/// Where tracked users are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL (CORS origin, cookie `Secure` flag)
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Toggl Track API base URL
    pub toggl_api_url: String,
    /// Timezone used when a request does not name one
    pub default_timezone: Tz,
    /// Upper bound on a single Toggl request
    pub fetch_timeout: Duration,
    /// How often the shared display reloads the leaderboard
    pub refresh_interval_minutes: u32,
    /// GCP project ID
    pub gcp_project_id: String,
    /// GCP region (KMS key location)
    pub gcp_region: String,
    /// Cloud KMS key name; when set, credentials are encrypted with KMS
    pub kms_key_name: Option<String>,
    /// User store backend
    pub store_backend: StoreBackend,

    // --- Secrets ---
    /// Shared administrator password
    pub admin_password: String,
    /// JWT signing key for admin sessions (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// Key material for local credential encryption
    pub credential_key: Option<Vec<u8>>,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            toggl_api_url: DEFAULT_TOGGL_API_URL.to_string(),
            default_timezone: chrono_tz::America::New_York,
            fetch_timeout: Duration::from_secs(5),
            refresh_interval_minutes: 60,
            gcp_project_id: "test-project".to_string(),
            gcp_region: "us-west1".to_string(),
            kms_key_name: None,
            store_backend: StoreBackend::Memory,
            admin_password: "test_admin_password".to_string(),
            session_signing_key: b"test_session_key_32_bytes_minimum!!".to_vec(),
            credential_key: Some(b"test_credential_key_material".to_vec()),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let default_timezone = match env::var("DEFAULT_TIMEZONE") {
            Ok(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::Invalid("DEFAULT_TIMEZONE", name))?,
            Err(_) => chrono_tz::America::New_York,
        };

        let fetch_timeout_secs: u64 = env::var("TOGGL_FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "firestore".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "firestore" => StoreBackend::Firestore,
            "memory" => StoreBackend::Memory,
            other => return Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        };

        let session_signing_key = env::var("SESSION_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
            .into_bytes();
        if session_signing_key.len() < MIN_SIGNING_KEY_LEN {
            return Err(ConfigError::Invalid(
                "SESSION_SIGNING_KEY",
                format!("must be at least {} bytes", MIN_SIGNING_KEY_LEN),
            ));
        }

        let kms_key_name = env::var("KMS_KEY_NAME").ok().filter(|v| !v.trim().is_empty());
        let credential_key = env::var("CREDENTIAL_ENCRYPTION_KEY")
            .ok()
            .map(|v| v.trim().as_bytes().to_vec())
            .filter(|v| !v.is_empty());
        if kms_key_name.is_none() && credential_key.is_none() {
            return Err(ConfigError::Missing("CREDENTIAL_ENCRYPTION_KEY"));
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            toggl_api_url: env::var("TOGGL_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_TOGGL_API_URL.to_string()),
            default_timezone,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            refresh_interval_minutes: env::var("REFRESH_INTERVAL_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            gcp_region: env::var("GCP_REGION").unwrap_or_else(|_| "us-west1".to_string()),
            kms_key_name,
            store_backend,

            admin_password: env::var("ADMIN_PASSWORD")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("ADMIN_PASSWORD"))?,
            session_signing_key,
            credential_key,
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
