//! Single-use enforcement for resolution tokens
//!
//! A token carrying several links may be presented once per link position,
//! so the guard remembers `(nonce, position)` pairs rather than bare nonces.

use std::collections::HashMap;
use std::sync::Mutex;

use super::payload::TokenPayload;
use crate::{Error, Result};

/// Remembers used token link positions until their tokens expire
#[derive(Debug, Default)]
pub struct ReplayGuard {
    /// (nonce, link position) -> expiry (epoch millis)
    seen: Mutex<HashMap<(String, usize), i64>>,
}

impl ReplayGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept one link position of the payload once; later presentations of
    /// the same position fail until expiry
    pub fn check_and_consume(&self, payload: &TokenPayload, link: usize, now_ms: i64) -> Result<()> {
        let mut seen = self
            .seen
            .lock()
            .map_err(|_| Error::internal("replay guard lock poisoned"))?;

        seen.retain(|_, expires_at| *expires_at >= now_ms);

        let key = (payload.nonce.clone(), link);
        if seen.contains_key(&key) {
            return Err(Error::TokenReplayed {
                nonce: payload.nonce.clone(),
            });
        }

        seen.insert(key, payload.expires_at);
        Ok(())
    }

    /// Number of link positions currently remembered
    pub fn len(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
