//! Mapping of raw HTTP responses to JSON documents and typed errors.

use serde_json::Value;

use crate::error::ApiError;

/// Fallback wait when a 429 response carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

/// Parses a successful response body.
///
/// An empty body, or the literal `null`, maps to [`Value::Null`] so callers
/// can treat it as an absent result.
pub fn parse_body(text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text)?)
}

/// Extracts the service's error message from a failure body.
///
/// Failure bodies are usually `{"message": "...", "typeKey": "..."}`; anything
/// else is returned as-is.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Maps a non-success status to an [`ApiError`].
pub fn error_for_status(
    status: u16,
    resource: &str,
    retry_after: Option<&str>,
    body: &str,
) -> ApiError {
    match status {
        401 => ApiError::Unauthorized,
        404 => ApiError::NotFound {
            resource: resource.to_string(),
        },
        429 => ApiError::RateLimited {
            retry_after_seconds: retry_after
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS),
        },
        _ => ApiError::RequestFailed {
            status,
            message: error_message(body),
        },
    }
}
