//! Resolution token plaintext

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

/// Length in bytes of the random replay nonce before encoding
const NONCE_BYTES: usize = 16;

/// One share link, or an ordered batch of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    /// A single share URL
    Single(String),
    /// Several share URLs, addressed by position
    Many(Vec<String>),
}

impl Target {
    /// Number of links carried
    pub fn len(&self) -> usize {
        match self {
            Target::Single(_) => 1,
            Target::Many(links) => links.len(),
        }
    }

    /// True when no link is carried
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Link at `position`, if present
    pub fn get(&self, position: usize) -> Option<&str> {
        match self {
            Target::Single(link) if position == 0 => Some(link.as_str()),
            Target::Single(_) => None,
            Target::Many(links) => links.get(position).map(String::as_str),
        }
    }

    /// Iterate over the carried links in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let links: Vec<&str> = match self {
            Target::Single(link) => vec![link.as_str()],
            Target::Many(links) => links.iter().map(String::as_str).collect(),
        };
        links.into_iter()
    }
}

impl From<&str> for Target {
    fn from(link: &str) -> Self {
        Target::Single(link.to_string())
    }
}

impl From<String> for Target {
    fn from(link: String) -> Self {
        Target::Single(link)
    }
}

impl From<Vec<String>> for Target {
    fn from(links: Vec<String>) -> Self {
        Target::Many(links)
    }
}

/// Decoded contents of a resolution token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TokenPayload {
    /// Share link(s) to resolve
    pub target: Target,
    /// Expiry as epoch milliseconds
    pub expires_at: i64,
    /// Single-use identifier
    pub nonce: String,
}

impl TokenPayload {
    /// Build a payload expiring `ttl_ms` from now with a fresh nonce
    pub fn new(target: impl Into<Target>, ttl_ms: u64) -> crate::Result<Self> {
        let ttl_ms = i64::try_from(ttl_ms).map_err(|_| {
            crate::Error::config("token.ttl_ms", &format!("Token TTL {} ms is too large", ttl_ms))
        })?;
        Self::with_expiry(target, now_millis().saturating_add(ttl_ms))
    }

    /// Build a payload with an explicit expiry
    pub fn with_expiry(target: impl Into<Target>, expires_at: i64) -> crate::Result<Self> {
        let mut raw = [0u8; NONCE_BYTES];
        getrandom::getrandom(&mut raw)
            .map_err(|e| crate::Error::internal(format!("Failed to draw token nonce: {}", e)))?;

        Ok(Self {
            target: target.into(),
            expires_at,
            nonce: URL_SAFE_NO_PAD.encode(raw),
        })
    }

    /// True once the server clock has passed the expiry
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_millis())
    }

    /// Expiry check against an explicit clock reading
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }
}

/// Current wall-clock time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
