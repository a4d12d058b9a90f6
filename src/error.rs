//! Unified error handling for the boards client.
//!
//! The error hierarchy uses `thiserror` so callers can match on the kind of
//! failure instead of inspecting messages.
//!
//! ## Error Categories
//!
//! - [`ApiError`]: Transport failures surfaced by the HTTP layer
//! - [`ClientError::UnknownQueryType`]: A query result with a missing or unrecognized shape
//! - [`ClientError::InvalidArgument`]: A required argument was empty or nil
//! - [`ClientError::Cancelled`]: The caller's cancellation token fired
//! - [`ConfigError`]: Errors from configuration loading and validation
//!
//! ## Example
//!
//! ```rust
//! use boards_client::error::{ApiError, ClientError};
//!
//! let err: ClientError = ApiError::Unauthorized.into();
//! assert!(err.is_transport());
//! assert!(!err.is_cancelled());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the boards client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The transport failed to deliver a response.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A work item query result carried a missing or unrecognized `queryType`.
    #[error("Unknown work item query type: {}", query_type.as_deref().unwrap_or("<missing>"))]
    UnknownQueryType {
        /// The discriminator found in the response, if any.
        query_type: Option<String>,
    },

    /// A required argument was empty, nil or otherwise unusable.
    #[error("Invalid argument `{name}`: {message}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// Why the argument was rejected.
        message: String,
    },

    /// The operation was cancelled through its cancellation token.
    #[error("Operation cancelled")]
    Cancelled,

    /// An error occurred while loading or validating configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Builds an [`ClientError::InvalidArgument`].
    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    /// Returns true for failures raised by the transport.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    /// Returns true when the operation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns true when a query result had an unusable shape discriminator.
    pub fn is_unknown_query_type(&self) -> bool {
        matches!(self, Self::UnknownQueryType { .. })
    }
}

/// Errors that can occur when talking to the remote service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API request was unauthorized (401).
    #[error("Unauthorized: invalid or expired Personal Access Token")]
    Unauthorized,

    /// The requested resource was not found (404).
    #[error("Resource not found: {resource}")]
    NotFound {
        /// URL of the resource that was not found.
        resource: String,
    },

    /// The API rate limit was exceeded (429).
    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimited {
        /// Number of seconds to wait before retrying.
        retry_after_seconds: u64,
    },

    /// The API returned an error response.
    #[error("API request failed with status {status}: {message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Failed to parse the API response.
    #[error("Failed to parse API response: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::ParseError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Api(err.into())
    }
}

/// Errors that can occur during configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration field is missing.
    #[error("{field} is required (use --{field}, {env_var} env var, or config file)")]
    MissingRequired {
        /// Name of the missing field.
        field: String,
        /// Environment variable name for this field.
        env_var: String,
    },

    /// Failed to read the configuration file.
    #[error("Failed to read config file at {path}: {message}")]
    FileReadError {
        /// Path to the config file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file at {path}: {message}")]
    ParseError {
        /// Path to the config file.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// An invalid value was provided for a configuration field.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        /// Name of the field with invalid value.
        field: String,
        /// Description of why the value is invalid.
        message: String,
    },

    /// Failed to parse a date string.
    #[error("Failed to parse date '{input}': {message}")]
    DateParseError {
        /// The input date string.
        input: String,
        /// Parse error message.
        message: String,
    },
}

/// Type alias for Results using [`ClientError`].
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// # API Error Display
    ///
    /// Tests that API errors display correctly formatted messages.
    ///
    /// ## Test Scenario
    /// - Creates various ApiError variants
    /// - Tests their Display implementation
    ///
    /// ## Expected Outcome
    /// - Each error variant produces a clear, informative message
    #[test]
    fn test_api_error_display() {
        let unauthorized = ApiError::Unauthorized;
        assert!(unauthorized.to_string().contains("Unauthorized"));

        let not_found = ApiError::NotFound {
            resource: "workitems/42".to_string(),
        };
        assert!(not_found.to_string().contains("workitems/42"));

        let rate_limited = ApiError::RateLimited {
            retry_after_seconds: 60,
        };
        assert!(rate_limited.to_string().contains("60 seconds"));

        let request_failed = ApiError::RequestFailed {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert!(request_failed.to_string().contains("500"));
        assert!(request_failed.to_string().contains("Internal Server Error"));
    }

    /// # Client Error Classification
    ///
    /// Tests that each error kind is distinguishable through the helpers.
    ///
    /// ## Test Scenario
    /// - Builds one error of every client-facing kind
    ///
    /// ## Expected Outcome
    /// - Only the matching helper returns true for each kind
    #[test]
    fn test_client_error_classification() {
        let transport: ClientError = ApiError::Unauthorized.into();
        assert!(transport.is_transport());
        assert!(!transport.is_unknown_query_type());

        let unknown = ClientError::UnknownQueryType { query_type: None };
        assert!(unknown.is_unknown_query_type());
        assert!(!unknown.is_transport());
        assert!(unknown.to_string().contains("<missing>"));

        let named = ClientError::UnknownQueryType {
            query_type: Some("graph".to_string()),
        };
        assert!(named.to_string().contains("graph"));

        let cancelled = ClientError::Cancelled;
        assert!(cancelled.is_cancelled());
        assert!(!cancelled.is_transport());

        let invalid = ClientError::invalid_argument("project", "cannot be empty");
        assert!(invalid.to_string().contains("project"));
        assert!(!invalid.is_transport());
    }

    /// # Parse Errors Are Transport Errors
    ///
    /// Tests that serde_json failures map onto the transport category.
    ///
    /// ## Test Scenario
    /// - Parses invalid JSON and converts the failure
    ///
    /// ## Expected Outcome
    /// - The converted error is an `ApiError::ParseError`
    #[test]
    fn test_serde_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let client_error: ClientError = err.into();
        assert!(matches!(
            client_error,
            ClientError::Api(ApiError::ParseError { .. })
        ));
    }

    /// # Config Error Display
    ///
    /// Tests that Config errors display correctly formatted messages.
    ///
    /// ## Test Scenario
    /// - Creates various ConfigError variants
    ///
    /// ## Expected Outcome
    /// - Messages carry the field name and the environment variable hint
    #[test]
    fn test_config_error_display() {
        let missing = ConfigError::MissingRequired {
            field: "pat".to_string(),
            env_var: "BOARDS_PAT".to_string(),
        };
        let msg = missing.to_string();
        assert!(msg.contains("pat"));
        assert!(msg.contains("BOARDS_PAT"));
        assert!(msg.contains("--pat"));

        let config: ClientError = missing.into();
        assert!(matches!(config, ClientError::Config(_)));
    }
}
