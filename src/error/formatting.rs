//! Error formatting utilities
//!
//! Two audiences: API callers get a short generic message that never reveals
//! which scrape step failed, server logs get the full chain of causes.

use crate::Error;
use std::error::Error as StdError;

/// Format error for display with nested causes
pub fn format_error(error: &Error) -> String {
    let formatted = match error {
        Error::UpstreamInvalidResponse { stage, details } => {
            format!("Upstream response rejected at {}: {}", stage, details)
        }

        Error::UpstreamTransport {
            operation,
            message,
            status,
        } => match status {
            Some(code) => format!("Upstream '{}' failed (HTTP {}): {}", operation, code, message),
            None => format!("Upstream '{}' failed: {}", operation, message),
        },

        Error::Timeout {
            operation,
            duration_secs,
        } => {
            format!(
                "Operation '{}' timed out after {} seconds",
                operation, duration_secs
            )
        }

        Error::Config { field, message } => {
            format!("Configuration error in {}: {}", field, message)
        }

        _ => error.to_string(),
    };

    let mut result = formatted;
    let mut source = error.source();

    while let Some(cause) = source {
        if !result.contains(&cause.to_string()) {
            result = format!("{} (caused by {})", result, cause);
        }
        source = cause.source();
    }

    result
}

/// Client-safe message for the `error` field of API responses
pub fn format_error_for_api(error: &Error) -> &'static str {
    match error {
        Error::MissingParameter { .. } => "Missing data",
        Error::InvalidParameter { .. } => "Invalid data",
        Error::Decryption { .. } => "Invalid encrypted data",
        Error::TokenExpired { .. } => "Expired token",
        Error::TokenReplayed { .. } => "Token already used",
        Error::UpstreamInvalidResponse { .. } => "Invalid response",
        Error::IndexOutOfRange { .. } => "File not found",
        Error::UpstreamTransport { .. } | Error::Http(..) => "Upstream request failed",
        Error::Timeout { .. } => "Upstream request timed out",
        _ => "Unknown Error",
    }
}

/// Format error for logging with structured data
pub fn format_error_for_logging(error: &Error) -> serde_json::Value {
    let mut log_data = serde_json::json!({
        "message": format_error(error),
        "category": error.category(),
        "client_error": error.is_client_error(),
    });

    match error {
        Error::UpstreamInvalidResponse { stage, .. } => {
            log_data["stage"] = serde_json::Value::String(stage.clone());
        }
        Error::UpstreamTransport {
            status: Some(code), ..
        } => {
            log_data["upstream_status"] = serde_json::Value::Number((*code).into());
        }
        Error::Timeout { duration_secs, .. } => {
            log_data["timeout_duration"] = serde_json::Value::Number((*duration_secs).into());
        }
        Error::IndexOutOfRange { index, len } => {
            log_data["index"] = serde_json::Value::Number((*index).into());
            log_data["listing_len"] = serde_json::Value::Number((*len).into());
        }
        _ => {}
    }

    log_data
}
