//! Internal data structures of the provider scrape

use serde::{Deserialize, Serialize};

/// State scraped from the share page, alive for one resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSession {
    /// Anti-bot token embedded in the share page
    pub js_token: String,
    /// Request correlation id embedded in the share page
    pub log_id: String,
    /// Short-link id taken from the redirect target's `surl` parameter
    pub short_url: String,
    /// Canonical page URL the provider redirected to
    pub referer: String,
}

/// Ordered file listing of one share, entries kept as the provider sent them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileListing {
    pub entries: Vec<serde_json::Value>,
}

impl FileListing {
    pub fn new(entries: Vec<serde_json::Value>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take entry `index` out of the listing
    pub fn select(mut self, index: usize) -> crate::Result<serde_json::Value> {
        let len = self.entries.len();
        if index >= len {
            return Err(crate::Error::IndexOutOfRange { index, len });
        }
        Ok(self.entries.swap_remove(index))
    }

    /// Parse the listing endpoint body; a body without a `list` array is rejected
    pub fn from_list_body(body: &str) -> crate::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
            crate::Error::upstream_invalid("share_list", &format!("body is not JSON: {}", e))
        })?;

        match value.get("list") {
            Some(serde_json::Value::Array(entries)) => Ok(Self::new(entries.clone())),
            Some(_) => Err(crate::Error::upstream_invalid(
                "share_list",
                "`list` is not an array",
            )),
            None => {
                let errno = value
                    .get("errno")
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "absent".to_string());
                Err(crate::Error::upstream_invalid(
                    "share_list",
                    &format!("no `list` field (errno {})", errno),
                ))
            }
        }
    }
}
