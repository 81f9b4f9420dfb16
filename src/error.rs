// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid Toggl credentials")]
    InvalidCredential,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Toggl API unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidTimezone(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredential | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, details) = match &self {
            AppError::InvalidTimezone(tz) => ("invalid_timezone", Some(tz.clone())),
            AppError::InvalidCredential => (
                "invalid_credential",
                Some("Invalid Toggl credentials. Please check your email and password.".to_string()),
            ),
            AppError::Unauthorized => ("unauthorized", None),
            AppError::NotFound(msg) => ("not_found", Some(msg.clone())),
            AppError::DuplicateEmail => {
                ("duplicate_email", Some("Email is already registered".to_string()))
            }
            AppError::BadRequest(msg) => ("bad_request", Some(msg.clone())),
            AppError::UpstreamUnavailable(msg) => {
                tracing::warn!(error = %msg, "Toggl API unavailable");
                ("upstream_unavailable", None)
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                ("database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                ("internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
