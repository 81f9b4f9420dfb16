// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hours Board API Server
//!
//! Serves a live leaderboard of how many hours each team member has
//! tracked in Toggl Track today.

use hours_board::{
    config::{Config, StoreBackend},
    db::{FirestoreDb, MemoryStore, UserStore},
    services::{CredentialCipher, KmsCipher, LocalCipher},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        timezone = %config.default_timezone.name(),
        "Starting Hours Board API"
    );

    let store: Arc<dyn UserStore> = match config.store_backend {
        StoreBackend::Firestore => Arc::new(
            FirestoreDb::new(&config.gcp_project_id)
                .await
                .expect("Failed to connect to Firestore"),
        ),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory user store; users are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let cipher: Arc<dyn CredentialCipher> = match (&config.kms_key_name, &config.credential_key) {
        (Some(key_name), _) => {
            let kms = KmsCipher::new(&config.gcp_project_id, &config.gcp_region, key_name)
                .await
                .expect("Failed to initialize KMS service");
            tracing::info!(key = %key_name, "KMS credential encryption initialized");
            Arc::new(kms)
        }
        (None, Some(key_material)) => {
            tracing::info!("Local credential encryption initialized");
            Arc::new(LocalCipher::new(key_material).expect("Invalid CREDENTIAL_ENCRYPTION_KEY"))
        }
        (None, None) => return Err("CREDENTIAL_ENCRYPTION_KEY or KMS_KEY_NAME is required".into()),
    };

    let state = Arc::new(AppState::new(config.clone(), store, cipher));

    // Build router
    let app = hours_board::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hours_board=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
