//! Error taxonomy for the resolver
//!
//! Every failure in the resolution pipeline collapses into one of these
//! variants. The HTTP boundary maps them onto a small set of status codes and
//! generic messages; the detail carried here is for server-side logs only.

use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error)]
pub enum Error {
    /// A required request parameter was absent
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// Name of the missing parameter
        name: String,
    },

    /// A request parameter was present but unusable
    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Name of the offending parameter
        name: String,
        /// What was wrong with it
        message: String,
    },

    /// Resolution token decoded but its expiry has passed
    #[error("Resolution token expired at {expired_at_ms} (now {now_ms})")]
    TokenExpired {
        /// Expiry carried by the token, epoch millis
        expired_at_ms: i64,
        /// Server clock at check time, epoch millis
        now_ms: i64,
    },

    /// Resolution token was already presented once
    #[error("Resolution token nonce {nonce} was already used")]
    TokenReplayed {
        /// Nonce of the replayed token
        nonce: String,
    },

    /// Token could not be decoded or authenticated
    #[error("Token decryption failed: {reason}")]
    Decryption {
        /// Which decoding step failed
        reason: String,
    },

    /// The provider answered, but not with what the scraper expected
    #[error("Invalid upstream response at stage '{stage}': {details}")]
    UpstreamInvalidResponse {
        /// Scrape stage that rejected the response
        stage: String,
        /// Detailed description for logs
        details: String,
    },

    /// Network or HTTP status failure talking to the provider
    #[error("Upstream request '{operation}' failed: {message}")]
    UpstreamTransport {
        /// Outbound call that failed
        operation: String,
        /// Error message describing the failure
        message: String,
        /// HTTP status returned by the provider, if any
        status: Option<u16>,
    },

    /// Timeout errors
    #[error("Operation timed out after {duration_secs} seconds: {operation}")]
    Timeout {
        /// The operation that timed out
        operation: String,
        /// Duration in seconds before timing out
        duration_secs: u64,
    },

    /// Requested position does not exist in the share's file list
    #[error("Index {index} out of range for listing of {len} entries")]
    IndexOutOfRange {
        /// Requested zero-based index
        index: usize,
        /// Number of entries the provider returned
        len: usize,
    },

    /// The resolver endpoint answered a client request with an error
    #[error("Resolver rejected request (HTTP {status}): {message}")]
    ResolverRejected {
        /// HTTP status returned by the resolver endpoint
        status: u16,
        /// Message from the `error` field of the response body
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error in {field}: {message}")]
    Config {
        /// The configuration field that has an error
        field: String,
        /// Error message describing the issue
        message: String,
    },

    /// HTTP client errors not attributed to a specific upstream call
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal issue
        message: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a missing parameter error
    pub fn missing_parameter<S: Into<String>>(name: S) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<S: Into<String>>(name: S, message: S) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a decryption error
    pub fn decryption<S: Into<String>>(reason: S) -> Self {
        Self::Decryption {
            reason: reason.into(),
        }
    }

    /// Create an invalid upstream response error
    pub fn upstream_invalid<S: Into<String>>(stage: S, details: S) -> Self {
        Self::UpstreamInvalidResponse {
            stage: stage.into(),
            details: details.into(),
        }
    }

    /// Create an upstream transport error
    pub fn upstream_transport<S: Into<String>>(operation: S, message: S) -> Self {
        Self::UpstreamTransport {
            operation: operation.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create an upstream transport error for a non-success status
    pub fn upstream_status<S: Into<String>>(operation: S, status: u16) -> Self {
        Self::UpstreamTransport {
            operation: operation.into(),
            message: format!("provider returned status {}", status),
            status: Some(status),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, duration_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration_secs,
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(field: S, message: S) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Classify a reqwest failure on a named provider call
    pub fn from_upstream(operation: &str, err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            return Self::timeout(operation, timeout_secs);
        }
        Self::UpstreamTransport {
            operation: operation.to_string(),
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
        }
    }

    /// True for failures caused by the caller's input rather than the upstream
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MissingParameter { .. }
                | Error::InvalidParameter { .. }
                | Error::TokenExpired { .. }
                | Error::TokenReplayed { .. }
                | Error::Decryption { .. }
                | Error::IndexOutOfRange { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::MissingParameter { .. } => "missing_parameter",
            Error::InvalidParameter { .. } => "invalid_parameter",
            Error::TokenExpired { .. } => "token_expired",
            Error::TokenReplayed { .. } => "token_replayed",
            Error::Decryption { .. } => "decryption",
            Error::UpstreamInvalidResponse { .. } => "upstream_invalid_response",
            Error::UpstreamTransport { .. } => "upstream_transport",
            Error::Timeout { .. } => "timeout",
            Error::IndexOutOfRange { .. } => "index_out_of_range",
            Error::ResolverRejected { .. } => "server_rejected",
            Error::Config { .. } => "config",
            Error::Http(..) => "http",
            Error::Json(..) => "json",
            Error::Toml(..) => "toml",
            Error::Url(..) => "url",
            Error::Io(..) => "io",
            Error::Internal { .. } => "internal",
        }
    }
}
