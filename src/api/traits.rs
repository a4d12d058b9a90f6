//! The HTTP transport seam.
//!
//! The client never talks to `reqwest` directly. Every call goes through
//! [`HttpTransport`], which takes a fully built request and hands back the
//! response body as JSON. This keeps the client logic testable with
//! [`mocks::MockTransport`] and lets callers plug in their own transport.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::credential::PatCredential;
use super::mappers;
use crate::error::{ApiError, ClientError};

/// Content type of JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Content type of JSON-Patch request bodies.
pub const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
    pub content_type: &'static str,
}

impl HttpRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            body: None,
            content_type: JSON_CONTENT_TYPE,
        }
    }

    pub fn post(url: Url, body: Value) -> Self {
        Self {
            method: Method::POST,
            url,
            body: Some(body),
            content_type: JSON_CONTENT_TYPE,
        }
    }

    /// A JSON-Patch request, used to create and update work items.
    pub fn patch_document(method: Method, url: Url, body: Value) -> Self {
        Self {
            method,
            url,
            body: Some(body),
            content_type: JSON_PATCH_CONTENT_TYPE,
        }
    }

    pub fn delete(url: Url) -> Self {
        Self {
            method: Method::DELETE,
            url,
            body: None,
            content_type: JSON_CONTENT_TYPE,
        }
    }
}

/// Sends requests and returns their JSON bodies.
///
/// Implementations return [`Value::Null`] for an empty or `null` body and
/// map failure statuses to [`ApiError`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<Value, ApiError>;
}

/// [`HttpTransport`] backed by a `reqwest` client with PAT authentication.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(credential: &PatCredential) -> crate::error::Result<Self> {
        Self::with_timeout(credential, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(credential: &PatCredential, timeout: Duration) -> crate::error::Result<Self> {
        if credential.is_blank() {
            return Err(ClientError::invalid_argument(
                "pat",
                "personal access token must not be empty",
            ));
        }

        let mut authorization = HeaderValue::from_str(&credential.authorization_header())
            .map_err(|e| ClientError::invalid_argument("pat", e.to_string()))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(ApiError::from)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<Value, ApiError> {
        debug!(method = %request.method, url = %request.url, "Sending request");

        let mut builder = self.client.request(request.method.clone(), request.url.clone());
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, request.content_type)
                .body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), url = %request.url, "Request failed");
            return Err(mappers::error_for_status(
                status.as_u16(),
                request.url.as_str(),
                retry_after.as_deref(),
                &text,
            ));
        }

        let text = response.text().await?;
        mappers::parse_body(&text)
    }
}
