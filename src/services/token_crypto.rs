// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Symmetric cipher for OAuth refresh tokens at rest.
//!
//! AES-256-GCM with a random 96-bit nonce per encryption and the owning
//! user id bound as AAD, so a ciphertext cannot be replayed onto another
//! user's account row. Wire form: base64(nonce || ciphertext || tag).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use uuid::Uuid;

/// Token encryption/decryption service.
#[derive(Clone)]
pub struct TokenCipher {
    key: [u8; 32],
}

impl TokenCipher {
    /// Create a cipher from a raw 32-byte key.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let key: [u8; 32] = key.try_into().map_err(|_| CryptoError::InvalidKey)?;
        Ok(Self { key })
    }

    /// AAD binding a ciphertext to its owning user.
    pub fn user_aad(user_id: Uuid) -> String {
        format!("user:{}", user_id)
    }

    /// Encrypt a plaintext token. Returns the base64 wire form.
    pub fn encrypt(&self, plaintext: &str, aad: &[u8]) -> Result<String, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        SystemRandom::new()
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::Encrypt)?;

        let mut in_out = plaintext.as_bytes().to_vec();
        self.sealing_key()?
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from(aad),
                &mut in_out,
            )
            .map_err(|_| CryptoError::Encrypt)?;

        let mut wire = Vec::with_capacity(NONCE_LEN + in_out.len());
        wire.extend_from_slice(&nonce_bytes);
        wire.extend_from_slice(&in_out);
        Ok(BASE64.encode(wire))
    }

    /// Decrypt a base64 wire-form ciphertext.
    ///
    /// Any failure (bad base64, truncated data, wrong key, wrong AAD,
    /// tampered ciphertext) is a [`CryptoError::Decrypt`] — never a
    /// plausible-looking wrong string.
    pub fn decrypt(&self, ciphertext_b64: &str, aad: &[u8]) -> Result<String, CryptoError> {
        let wire = BASE64
            .decode(ciphertext_b64)
            .map_err(|_| CryptoError::Decrypt)?;

        if wire.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(CryptoError::Decrypt);
        }

        let (nonce_bytes, ciphertext) = wire.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| CryptoError::Decrypt)?;

        let mut in_out = ciphertext.to_vec();
        let plaintext = self
            .sealing_key()?
            .open_in_place(nonce, Aad::from(aad), &mut in_out)
            .map_err(|_| CryptoError::Decrypt)?;

        String::from_utf8(plaintext.to_vec()).map_err(|_| CryptoError::Decrypt)
    }

    fn sealing_key(&self) -> Result<LessSafeKey, CryptoError> {
        let unbound = UnboundKey::new(&AES_256_GCM, &self.key).map_err(|_| CryptoError::InvalidKey)?;
        Ok(LessSafeKey::new(unbound))
    }
}

/// Errors from token encryption/decryption.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Token encryption key must be exactly 32 bytes")]
    InvalidKey,

    #[error("Token encryption failed")]
    Encrypt,

    #[error("Token decryption failed (corrupt ciphertext, wrong key, or wrong AAD)")]
    Decrypt,
}

impl From<CryptoError> for crate::error::AppError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Decrypt => crate::error::AppError::Decrypt(err.to_string()),
            other => crate::error::AppError::Internal(anyhow::anyhow!(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher(byte: u8) -> TokenCipher {
        TokenCipher::new(&[byte; 32]).unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let c = cipher(0x42);
        let aad = TokenCipher::user_aad(Uuid::nil());

        let ct = c.encrypt("1//refresh-token-value", aad.as_bytes()).unwrap();
        let pt = c.decrypt(&ct, aad.as_bytes()).unwrap();
        assert_eq!(pt, "1//refresh-token-value");
    }

    #[test]
    fn test_nonce_is_random() {
        let c = cipher(0x42);
        let a = c.encrypt("same", b"aad").unwrap();
        let b = c.encrypt("same", b"aad").unwrap();
        assert_ne!(a, b, "two encryptions of the same plaintext must differ");
    }

    #[test]
    fn test_corrupted_ciphertext_fails() {
        let c = cipher(0x42);
        let ct = c.encrypt("secret", b"aad").unwrap();

        let mut wire = BASE64.decode(&ct).unwrap();
        let last = wire.len() - 1;
        wire[last] ^= 0x01;
        let tampered = BASE64.encode(wire);

        assert!(matches!(
            c.decrypt(&tampered, b"aad"),
            Err(CryptoError::Decrypt)
        ));
    }

    #[test]
    fn test_wrong_key_fails() {
        let ct = cipher(0x42).encrypt("secret", b"aad").unwrap();
        assert!(matches!(
            cipher(0x43).decrypt(&ct, b"aad"),
            Err(CryptoError::Decrypt)
        ));
    }

    #[test]
    fn test_wrong_aad_fails() {
        let c = cipher(0x42);
        let user_a = TokenCipher::user_aad(Uuid::nil());
        let user_b = TokenCipher::user_aad(Uuid::from_u128(1));

        let ct = c.encrypt("secret", user_a.as_bytes()).unwrap();
        assert!(matches!(
            c.decrypt(&ct, user_b.as_bytes()),
            Err(CryptoError::Decrypt)
        ));
    }

    #[test]
    fn test_garbage_inputs_fail() {
        let c = cipher(0x42);
        assert!(c.decrypt("not base64 at all!!!", b"aad").is_err());
        assert!(c.decrypt(&BASE64.encode(b"short"), b"aad").is_err());
    }

    #[test]
    fn test_key_length_enforced() {
        assert!(matches!(
            TokenCipher::new(&[0u8; 16]),
            Err(CryptoError::InvalidKey)
        ));
    }
}
