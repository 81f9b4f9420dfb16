// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Encryption at rest for Toggl credentials.
//!
//! The aggregation and registration code only see the `CredentialCipher`
//! capability. Every blob is bound to its owner's user ID as additional
//! authenticated data, so a blob copied onto another user fails to decrypt.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures_util::future::BoxFuture;
use hkdf::Hkdf;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;

use crate::error::AppError;
use crate::services::toggl::TogglCredential;

const HKDF_SALT: &[u8] = b"hours-board/credential-key/v1";
const HKDF_INFO: &[u8] = b"aes-256-gcm";

/// Encrypt/decrypt a stored credential for one user.
pub trait CredentialCipher: Send + Sync {
    /// Encrypt `plaintext`, returning a base64 blob.
    fn encrypt<'a>(
        &'a self,
        user_id: &'a str,
        plaintext: &'a str,
    ) -> BoxFuture<'a, Result<String, AppError>>;

    /// Decrypt a blob produced by `encrypt` for the same user.
    fn decrypt<'a>(
        &'a self,
        user_id: &'a str,
        blob: &'a str,
    ) -> BoxFuture<'a, Result<String, AppError>>;
}

/// Additional authenticated data binding a blob to its owner.
pub fn user_aad(user_id: &str) -> Vec<u8> {
    format!("user_id:{}", user_id).into_bytes()
}

/// Encrypt a Toggl credential for storage.
pub async fn seal_credential(
    cipher: &dyn CredentialCipher,
    user_id: &str,
    credential: &TogglCredential,
) -> Result<String, AppError> {
    cipher.encrypt(user_id, credential.expose()).await
}

/// Decrypt a stored Toggl credential.
pub async fn open_credential(
    cipher: &dyn CredentialCipher,
    user_id: &str,
    blob: &str,
) -> Result<TogglCredential, AppError> {
    cipher
        .decrypt(user_id, blob)
        .await
        .map(TogglCredential::from_stored)
}

/// AES-256-GCM with a key derived from configured key material.
///
/// Blob layout: `base64(nonce || ciphertext || tag)`.
pub struct LocalCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl LocalCipher {
    /// Derive the AES key from arbitrary-length key material via HKDF-SHA256.
    pub fn new(key_material: &[u8]) -> Result<Self, AppError> {
        if key_material.is_empty() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "Credential key material is empty"
            )));
        }

        let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), key_material);
        let mut okm = [0u8; 32];
        hk.expand(HKDF_INFO, &mut okm)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HKDF expand failed: {}", e)))?;

        let unbound = UnboundKey::new(&AES_256_GCM, &okm)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid AES key length")))?;

        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    fn seal(&self, aad: &[u8], plaintext: &str) -> Result<String, AppError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Nonce generation failed")))?;

        let mut in_out = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from(aad),
                &mut in_out,
            )
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Credential encryption failed")))?;

        let mut blob = nonce_bytes.to_vec();
        blob.extend_from_slice(&in_out);
        Ok(BASE64.encode(blob))
    }

    fn open(&self, aad: &[u8], blob: &str) -> Result<String, AppError> {
        let bytes = BASE64.decode(blob).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Credential base64 decode failed: {}", e))
        })?;

        if bytes.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "Credential blob too short"
            )));
        }

        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid credential nonce")))?;

        let mut in_out = ciphertext.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::from(aad), &mut in_out)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Credential decryption failed")))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("UTF-8 decode failed: {}", e)))
    }
}

impl CredentialCipher for LocalCipher {
    fn encrypt<'a>(
        &'a self,
        user_id: &'a str,
        plaintext: &'a str,
    ) -> BoxFuture<'a, Result<String, AppError>> {
        Box::pin(async move { self.seal(&user_aad(user_id), plaintext) })
    }

    fn decrypt<'a>(
        &'a self,
        user_id: &'a str,
        blob: &'a str,
    ) -> BoxFuture<'a, Result<String, AppError>> {
        Box::pin(async move { self.open(&user_aad(user_id), blob) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_for_same_user() {
        let cipher = LocalCipher::new(b"some key material").unwrap();
        let credential = TogglCredential::from_login("a@b.c", "pw");

        let blob = seal_credential(&cipher, "user-1", &credential).await.unwrap();
        assert!(!blob.contains(credential.expose()));

        let opened = open_credential(&cipher, "user-1", &blob).await.unwrap();
        assert_eq!(opened, credential);
    }

    #[tokio::test]
    async fn test_blob_is_bound_to_user() {
        let cipher = LocalCipher::new(b"some key material").unwrap();
        let blob = cipher.encrypt("user-1", "secret").await.unwrap();

        assert!(cipher.decrypt("user-2", &blob).await.is_err());
    }

    #[tokio::test]
    async fn test_wrong_key_fails() {
        let cipher = LocalCipher::new(b"key one").unwrap();
        let other = LocalCipher::new(b"key two").unwrap();
        let blob = cipher.encrypt("user-1", "secret").await.unwrap();

        assert!(other.decrypt("user-1", &blob).await.is_err());
    }

    #[tokio::test]
    async fn test_nonces_differ_between_encryptions() {
        let cipher = LocalCipher::new(b"some key material").unwrap();
        let a = cipher.encrypt("user-1", "secret").await.unwrap();
        let b = cipher.encrypt("user-1", "secret").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_garbage_blob_is_rejected() {
        let cipher = LocalCipher::new(b"some key material").unwrap();
        assert!(cipher.decrypt("user-1", "not base64!").await.is_err());
        assert!(cipher.decrypt("user-1", &BASE64.encode("short")).await.is_err());
    }

    #[test]
    fn test_empty_key_material_is_rejected() {
        assert!(LocalCipher::new(b"").is_err());
    }
}
