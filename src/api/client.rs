//! The boards client.

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use super::credential::PatCredential;
use super::traits::{HttpRequest, HttpTransport, ReqwestTransport};
use super::url_builder::{
    OnPremUrlBuilderFactory, OnlineUrlBuilderFactory, UrlBuilder, UrlBuilderFactory,
};
use crate::config::{ClientConfiguration, ConnectionSettings, ServiceTarget};
use crate::core::run_cancellable;
use crate::error::{ApiError, ClientError, Result};
use crate::models::CollectionResponse;

/// Client for work items, pull requests and identities.
///
/// Cheap to clone; clones share the transport, URL factory and
/// configuration. All state is immutable, so one client can serve any number
/// of concurrent calls.
///
/// # Example
///
/// ```rust,no_run
/// use boards_client::BoardsClient;
/// use boards_client::models::WorkItemsQuery;
/// use secrecy::SecretString;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> boards_client::error::Result<()> {
/// let client = BoardsClient::online("contoso", SecretString::from("pat".to_string()))?;
/// let query = WorkItemsQuery::new("SELECT [System.Id] FROM WorkItems");
/// let items = client
///     .get_work_items_for_query(&query, &CancellationToken::new())
///     .await?;
/// println!("{} work items", items.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BoardsClient {
    transport: Arc<dyn HttpTransport>,
    urls: Arc<dyn UrlBuilderFactory>,
    configuration: Arc<ClientConfiguration>,
}

impl BoardsClient {
    /// Builds a client from its parts.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        urls: Arc<dyn UrlBuilderFactory>,
        configuration: ClientConfiguration,
    ) -> Self {
        Self {
            transport,
            urls,
            configuration: Arc::new(configuration),
        }
    }

    /// Client for a hosted organization with default configuration.
    pub fn online(instance: &str, pat: SecretString) -> Result<Self> {
        let transport = ReqwestTransport::new(&PatCredential::new(pat))?;
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(OnlineUrlBuilderFactory::new(instance)?),
            ClientConfiguration::default(),
        ))
    }

    /// Client for an on-premises collection with default configuration.
    pub fn on_prem(base_url: Url, pat: SecretString) -> Result<Self> {
        let transport = ReqwestTransport::new(&PatCredential::new(pat))?;
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(OnPremUrlBuilderFactory::new(base_url)?),
            ClientConfiguration::default(),
        ))
    }

    /// Client for resolved connection settings.
    pub fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let client = match &settings.target {
            ServiceTarget::Online { instance } => Self::online(instance, settings.pat.clone())?,
            ServiceTarget::OnPrem { base_url } => {
                Self::on_prem(base_url.clone(), settings.pat.clone())?
            }
        };
        Ok(client.with_configuration(settings.configuration.clone()))
    }

    pub fn configuration(&self) -> &ClientConfiguration {
        &self.configuration
    }

    /// A client sharing this one's transport with a different configuration.
    pub fn with_configuration(&self, configuration: ClientConfiguration) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            urls: Arc::clone(&self.urls),
            configuration: Arc::new(configuration),
        }
    }

    pub(crate) fn url(&self) -> Result<UrlBuilder> {
        self.urls.create(None)
    }

    pub(crate) fn url_for_sub_domain(&self, sub_domain: &str) -> Result<UrlBuilder> {
        self.urls.create(Some(sub_domain))
    }

    /// Sends a request and returns the raw JSON body.
    pub(crate) async fn send_document(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        debug!(method = %request.method, url = %request.url, "Request");
        run_cancellable(cancel, async {
            self.transport
                .send(request)
                .await
                .map_err(ClientError::from)
        })
        .await
    }

    /// Sends a request, treating a `null` body as an absent result.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<T>> {
        let document = self.send_document(request, cancel).await?;
        if document.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(document)?))
    }

    /// Like [`Self::send`] but an absent body is an error.
    pub(crate) async fn send_required<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let url = request.url.to_string();
        self.send(request, cancel).await?.ok_or_else(|| {
            ApiError::ParseError {
                message: format!("empty response from {}", url),
            }
            .into()
        })
    }

    /// GETs one page of a collection.
    pub(crate) async fn fetch_page<T: DeserializeOwned>(
        &self,
        url: Url,
        cancel: &CancellationToken,
    ) -> Result<Option<CollectionResponse<T>>> {
        self.send(HttpRequest::get(url), cancel).await
    }

    /// GETs a collection, treating an absent body as empty.
    pub(crate) async fn fetch_list<T: DeserializeOwned>(
        &self,
        url: Url,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>> {
        let page = self.fetch_page(url, cancel).await?;
        Ok(CollectionResponse::into_items(page))
    }
}

impl std::fmt::Debug for BoardsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardsClient")
            .field("configuration", &self.configuration)
            .finish_non_exhaustive()
    }
}

pub(crate) fn require_non_empty(name: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::invalid_argument(name, "must not be empty"));
    }
    Ok(())
}
