// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{body::Body, http::header, response::Response};
use hours_board::config::Config;
use hours_board::db::{FirestoreDb, MemoryStore, UserStore};
use hours_board::middleware::auth::{create_admin_token, ADMIN_COOKIE};
use hours_board::models::TrackedUser;
use hours_board::routes::create_router;
use hours_board::services::cipher::seal_credential;
use hours_board::services::{CredentialCipher, LocalCipher, TogglCredential};
use hours_board::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// A router wired to an in-memory store and a local cipher.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub cipher: Arc<LocalCipher>,
}

/// Create a test app whose Toggl client points at `toggl_url`.
#[allow(dead_code)]
pub fn create_test_app(toggl_url: &str) -> TestApp {
    let config = Config {
        toggl_api_url: toggl_url.to_string(),
        ..Config::test_default()
    };
    create_test_app_with_config(config)
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let cipher = Arc::new(
        LocalCipher::new(config.credential_key.as_deref().unwrap_or(b"test"))
            .expect("test cipher"),
    );

    let state = Arc::new(AppState::new(
        config,
        store.clone() as Arc<dyn UserStore>,
        cipher.clone() as Arc<dyn CredentialCipher>,
    ));

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        cipher,
    }
}

/// Insert a user directly, encrypting `credential` with the app's cipher.
#[allow(dead_code)]
pub async fn seed_user(
    app: &TestApp,
    id: &str,
    name: &str,
    credential: &TogglCredential,
    is_active: bool,
) -> TrackedUser {
    let credential_encrypted = seal_credential(app.cipher.as_ref(), id, credential)
        .await
        .unwrap();
    let now = chrono::Utc::now().to_rfc3339();

    let user = TrackedUser {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", id),
        avatar: None,
        team: "Engineering".to_string(),
        credential_encrypted,
        is_active,
        created_at: now.clone(),
        updated_at: now,
    };
    app.store.create_user(&user).await.unwrap();
    user
}

/// `Cookie` header value carrying a valid admin session.
#[allow(dead_code)]
pub fn admin_cookie(app: &TestApp) -> String {
    let token = create_admin_token(&app.state.config.session_signing_key).unwrap();
    format!("{}={}", ADMIN_COOKIE, token)
}

/// A fixed-offset zone where the local time is currently between 12:00 and
/// 13:00, so entries from the last few hours fall on the local "today".
#[allow(dead_code)]
pub fn midday_timezone() -> chrono_tz::Tz {
    use chrono::Timelike;

    let utc_hour = chrono::Utc::now().hour() as i32;
    // Etc/GMT names invert the sign: Etc/GMT-5 is UTC+5
    let name = match 12 - utc_hour {
        0 => "Etc/GMT".to_string(),
        offset if offset > 0 => format!("Etc/GMT-{}", offset),
        offset => format!("Etc/GMT+{}", -offset),
    };
    name.parse().unwrap()
}

/// Query-string form of a zone name (`+` must not decode as a space).
#[allow(dead_code)]
pub fn tz_param(tz: chrono_tz::Tz) -> String {
    tz.name().replace('+', "%2B")
}

/// `Authorization` header value Toggl would receive for `credential`.
#[allow(dead_code)]
pub fn basic_auth(credential: &TogglCredential) -> String {
    format!("Basic {}", credential.expose())
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn json_body(value: serde_json::Value) -> Body {
    Body::from(serde_json::to_vec(&value).unwrap())
}
