// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tracked user model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A team member whose Toggl hours appear on the leaderboard.
///
/// Stored in Firestore keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedUser {
    /// Opaque user ID (UUID v4, also used as document ID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address, trimmed and lower-cased
    pub email: String,
    /// Avatar URL
    #[serde(default)]
    pub avatar: Option<String>,
    /// Team/company label
    #[serde(default)]
    pub team: String,
    /// Encrypted Toggl credential (base64)
    pub credential_encrypted: String,
    /// Only active users are shown on the leaderboard
    pub is_active: bool,
    /// When the user was created (ISO 8601)
    pub created_at: String,
    /// Last modification (ISO 8601)
    pub updated_at: String,
}

impl TrackedUser {
    /// Public view without the credential blob.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
            team: self.team.clone(),
            is_active: self.is_active,
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

/// Normalise an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User record as returned by the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub team: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Sarah.Johnson@Example.COM "), "sarah.johnson@example.com");
    }

    #[test]
    fn test_profile_omits_credential() {
        let user = TrackedUser {
            id: "u1".to_string(),
            name: "Sarah".to_string(),
            email: "sarah@example.com".to_string(),
            avatar: None,
            team: "Design".to_string(),
            credential_encrypted: "secret-blob".to_string(),
            is_active: true,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_string(&user.profile()).unwrap();
        assert!(!json.contains("secret-blob"));
        assert!(json.contains("\"team\":\"Design\""));
    }
}
