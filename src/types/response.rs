//! Response type definitions
//!
//! The resolution endpoint returns the provider's file entry verbatim;
//! [`FileEntry`] is the typed view clients read it through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One item of a provider file listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name as stored by the provider
    #[serde(default)]
    pub server_filename: String,

    /// Size in bytes
    #[serde(default)]
    pub size: u64,

    /// Upload time, epoch seconds
    #[serde(default)]
    pub server_ctime: i64,

    /// Direct, time-limited download URL
    #[serde(default)]
    pub dlink: String,

    /// Thumbnail URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbs: Option<Thumbnails>,

    /// Provider fields not modelled above
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Thumbnail URL set of a file entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url1: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FileEntry {
    /// Typed view of a raw provider entry
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Primary thumbnail URL, if the provider sent one
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbs.as_ref().and_then(|t| t.url1.as_deref())
    }

    /// Upload time as a UTC timestamp
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.server_ctime, 0)
    }

    /// True when the entry is a folder rather than a file
    pub fn is_dir(&self) -> bool {
        match self.extra.get("isdir") {
            Some(serde_json::Value::Number(n)) => n.as_u64() == Some(1),
            Some(serde_json::Value::String(s)) => s == "1",
            Some(serde_json::Value::Bool(b)) => *b,
            _ => false,
        }
    }
}

/// Ping response for health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    /// Server uptime in seconds
    pub server_uptime: u64,

    /// Server version
    pub version: String,
}

impl PingResponse {
    /// Create a new ping response
    pub fn new(server_uptime: u64, version: impl Into<String>) -> Self {
        Self {
            server_uptime,
            version: version.into(),
        }
    }
}

/// Error body returned by the resolution endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Generic, client-safe error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "server_filename": "holiday.mp4",
            "size": 10_485_760u64,
            "server_ctime": 1_700_000_000,
            "dlink": "https://d.terabox.com/file/abc",
            "thumbs": { "url1": "https://thumb/1.jpg", "url3": "https://thumb/3.jpg" },
            "fs_id": 123456789,
            "isdir": 0,
            "md5": "d41d8cd98f00b204e9800998ecf8427e"
        })
    }

    #[test]
    fn test_file_entry_fields() {
        let entry = FileEntry::from_value(sample()).unwrap();
        assert_eq!(entry.server_filename, "holiday.mp4");
        assert_eq!(entry.size, 10_485_760);
        assert_eq!(entry.server_ctime, 1_700_000_000);
        assert_eq!(entry.thumbnail(), Some("https://thumb/1.jpg"));
        assert!(!entry.is_dir());
        assert_eq!(entry.uploaded_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_unknown_fields_survive() {
        let entry = FileEntry::from_value(sample()).unwrap();
        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_folder_entry() {
        let entry = FileEntry::from_value(json!({
            "server_filename": "photos",
            "isdir": 1,
            "server_ctime": 1
        }))
        .unwrap();
        assert!(entry.is_dir());
        assert_eq!(entry.size, 0);
        assert!(entry.dlink.is_empty());
        assert_eq!(entry.thumbnail(), None);
    }

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_value(ErrorResponse::new("Expired token")).unwrap();
        assert_eq!(body, json!({ "error": "Expired token" }));
    }
}
