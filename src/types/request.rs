//! Request type definitions
//!
//! Query parameters accepted by the resolution endpoint.

use serde::{Deserialize, Serialize};

/// Query string of `GET /api`
///
/// Every field is optional at the extractor level so that a missing
/// parameter surfaces as our own error body instead of an axum rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveQuery {
    /// Sealed resolution token
    pub data: Option<String>,
    /// Zero-based position within the share's file list
    pub index: Option<String>,
    /// Zero-based position within a multi-link token
    pub link: Option<String>,
}

/// Validated form of [`ResolveQuery`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveParams {
    pub data: String,
    pub index: usize,
    pub link: usize,
}

impl ResolveQuery {
    /// Create a query for the given token and file index
    pub fn new(data: impl Into<String>, index: usize) -> Self {
        Self {
            data: Some(data.into()),
            index: Some(index.to_string()),
            link: None,
        }
    }

    /// Select a link within a multi-link token
    pub fn with_link(mut self, link: usize) -> Self {
        self.link = Some(link.to_string());
        self
    }

    /// Check presence first, then shape, before anything leaves the process
    pub fn validate(&self) -> crate::Result<ResolveParams> {
        let data = self
            .data
            .as_deref()
            .ok_or_else(|| crate::Error::missing_parameter("data"))?;
        let index = self
            .index
            .as_deref()
            .ok_or_else(|| crate::Error::missing_parameter("index"))?;

        if data.trim().is_empty() {
            return Err(crate::Error::invalid_parameter("data", "empty token"));
        }

        let index = parse_position("index", index)?;
        let link = match self.link.as_deref() {
            Some(link) => parse_position("link", link)?,
            None => 0,
        };

        Ok(ResolveParams {
            data: data.trim().to_string(),
            index,
            link,
        })
    }
}

fn parse_position(name: &str, raw: &str) -> crate::Result<usize> {
    raw.trim().parse::<usize>().map_err(|e| crate::Error::InvalidParameter {
        name: name.to_string(),
        message: format!("'{}' is not a non-negative integer: {}", raw, e),
    })
}
