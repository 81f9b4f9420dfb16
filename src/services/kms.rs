// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cloud KMS backed credential encryption.
//!
//! Uses direct KMS encryption (not envelope encryption). The user ID is sent
//! as additional authenticated data on both encrypt and decrypt.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures_util::future::BoxFuture;

use crate::error::AppError;
use crate::services::cipher::{user_aad, CredentialCipher};

/// KMS encryption service.
#[derive(Clone)]
pub struct KmsCipher {
    /// Full resource path to the KMS key
    /// Format: projects/{project}/locations/{location}/keyRings/{ring}/cryptoKeys/{key}
    key_path: String,

    /// GCP KMS client
    client: std::sync::Arc<google_cloud_kms::client::Client>,
}

impl KmsCipher {
    /// KMS Key Ring Name
    const KEY_RING_NAME: &str = "hours-board";

    /// Connect to GCP KMS.
    pub async fn new(project_id: &str, location: &str, key_name: &str) -> Result<Self, AppError> {
        let key_path = format!(
            "projects/{}/locations/{}/keyRings/{}/cryptoKeys/{}",
            project_id,
            location,
            Self::KEY_RING_NAME,
            key_name
        );

        let config = google_cloud_kms::client::ClientConfig::default()
            .with_auth()
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to create KMS auth config: {}", e))
            })?;

        let client = google_cloud_kms::client::Client::new(config)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to create KMS client: {}", e))
            })?;

        tracing::info!(key = %key_path, "KMS credential cipher initialized");

        Ok(Self {
            key_path,
            client: std::sync::Arc::new(client),
        })
    }

    async fn encrypt_with_aad(&self, plaintext: &str, aad: Vec<u8>) -> Result<String, AppError> {
        use google_cloud_googleapis::cloud::kms::v1::EncryptRequest;

        let req = EncryptRequest {
            name: self.key_path.clone(),
            plaintext: plaintext.as_bytes().to_vec(),
            additional_authenticated_data: aad,
            ..Default::default()
        };

        let response = self
            .client
            .encrypt(req, None)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("KMS encrypt failed: {}", e)))?;

        Ok(BASE64.encode(response.ciphertext))
    }

    async fn decrypt_with_aad(&self, ciphertext_b64: &str, aad: Vec<u8>) -> Result<String, AppError> {
        use google_cloud_googleapis::cloud::kms::v1::DecryptRequest;

        let ciphertext = BASE64.decode(ciphertext_b64).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Base64 decode failed: {}", e))
        })?;

        let req = DecryptRequest {
            name: self.key_path.clone(),
            ciphertext,
            additional_authenticated_data: aad,
            ..Default::default()
        };

        let response = self
            .client
            .decrypt(req, None)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("KMS decrypt failed: {}", e)))?;

        String::from_utf8(response.plaintext)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("UTF-8 decode failed: {}", e)))
    }
}

impl CredentialCipher for KmsCipher {
    fn encrypt<'a>(
        &'a self,
        user_id: &'a str,
        plaintext: &'a str,
    ) -> BoxFuture<'a, Result<String, AppError>> {
        Box::pin(self.encrypt_with_aad(plaintext, user_aad(user_id)))
    }

    fn decrypt<'a>(
        &'a self,
        user_id: &'a str,
        blob: &'a str,
    ) -> BoxFuture<'a, Result<String, AppError>> {
        Box::pin(self.decrypt_with_aad(blob, user_aad(user_id)))
    }
}
