//! Personal Access Token credential.
//!
//! The service accepts a PAT through HTTP Basic authentication with an empty
//! user name, so the header value is `Basic base64(":" + pat)`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};

/// PAT credential used to authenticate every request.
///
/// The token is held in a `SecretString` and never printed.
///
/// # Example
///
/// ```rust
/// use boards_client::api::PatCredential;
///
/// let credential = PatCredential::from_string("your-pat-token".to_string());
/// assert!(credential.authorization_header().starts_with("Basic "));
/// ```
#[derive(Clone)]
pub struct PatCredential {
    pat: SecretString,
}

impl PatCredential {
    /// Creates a new PAT credential from a SecretString.
    pub fn new(pat: SecretString) -> Self {
        Self { pat }
    }

    /// Creates a new PAT credential from a plain string.
    pub fn from_string(pat: String) -> Self {
        Self {
            pat: SecretString::from(pat),
        }
    }

    /// True when the wrapped token is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.pat.expose_secret().trim().is_empty()
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        let encoded = STANDARD.encode(format!(":{}", self.pat.expose_secret()));
        format!("Basic {}", encoded)
    }
}

impl std::fmt::Debug for PatCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatCredential")
            .field("pat", &"[REDACTED]")
            .finish()
    }
}
