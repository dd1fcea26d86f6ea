//! Sealing and opening of resolution tokens
//!
//! Wire layout, URL-safe base64 without padding:
//!
//! ```text
//! version (1) || xnonce (24) || ciphertext + tag
//! ```
//!
//! The version byte is bound as associated data, so it cannot be swapped
//! without failing authentication.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chacha20poly1305::{
    Key, XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};

use super::payload::{Target, TokenPayload};
use crate::{Error, Result, config::settings::MIN_SECRET_LEN};

/// Current token format
const TOKEN_VERSION: u8 = 1;

const XNONCE_LEN: usize = 24;

const TAG_LEN: usize = 16;

/// Domain separation for deriving the cipher key from the shared secret
const KEY_CONTEXT: &str = "terabox-resolver 2024-06 resolution token key";

/// Symmetric codec keyed by the deployment secret
#[derive(Clone)]
pub struct TokenCodec {
    cipher: XChaCha20Poly1305,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec from the shared secret
    pub fn new(secret: &str) -> Result<Self> {
        if secret.chars().count() < MIN_SECRET_LEN {
            return Err(Error::config(
                "token.secret",
                &format!("Token secret must be at least {} characters", MIN_SECRET_LEN),
            ));
        }

        let key = blake3::derive_key(KEY_CONTEXT, secret.as_bytes());
        Ok(Self {
            cipher: XChaCha20Poly1305::new(Key::from_slice(&key)),
        })
    }

    /// Seal a payload into an opaque token
    pub fn encode(&self, payload: &TokenPayload) -> Result<String> {
        let plaintext = serde_json::to_vec(payload)?;

        let mut nonce = [0u8; XNONCE_LEN];
        getrandom::getrandom(&mut nonce)
            .map_err(|e| Error::internal(format!("Failed to draw cipher nonce: {}", e)))?;

        let sealed = self
            .cipher
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: &plaintext,
                    aad: &[TOKEN_VERSION],
                },
            )
            .map_err(|_| Error::internal("Token encryption failed"))?;

        let mut raw = Vec::with_capacity(1 + XNONCE_LEN + sealed.len());
        raw.push(TOKEN_VERSION);
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&sealed);

        Ok(URL_SAFE_NO_PAD.encode(raw))
    }

    /// Build and seal a payload for `target` valid for `ttl_ms`
    pub fn issue(&self, target: impl Into<Target>, ttl_ms: u64) -> Result<String> {
        let payload = TokenPayload::new(target, ttl_ms)?;
        self.encode(&payload)
    }

    /// Open a token; any malformed input is a decryption failure
    pub fn decode(&self, token: &str) -> Result<TokenPayload> {
        let raw = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| Error::decryption(format!("token is not base64: {}", e)))?;

        if raw.len() < 1 + XNONCE_LEN + TAG_LEN {
            return Err(Error::decryption(format!(
                "token too short ({} bytes)",
                raw.len()
            )));
        }

        let (version, rest) = raw.split_at(1);
        if version[0] != TOKEN_VERSION {
            return Err(Error::decryption(format!(
                "unsupported token version {}",
                version[0]
            )));
        }

        let (nonce, sealed) = rest.split_at(XNONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: version,
                },
            )
            .map_err(|_| Error::decryption("authentication failed"))?;

        let payload: TokenPayload = serde_json::from_slice(&plaintext)
            .map_err(|e| Error::decryption(format!("plaintext is not a token payload: {}", e)))?;

        if payload.target.is_empty() || payload.target.iter().any(|link| link.trim().is_empty()) {
            return Err(Error::decryption("payload carries an empty target"));
        }

        Ok(payload)
    }
}
