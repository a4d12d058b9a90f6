//! Identity search.

use tokio_util::sync::CancellationToken;

use super::client::{BoardsClient, require_non_empty};
use crate::error::Result;
use crate::models::Identity;

/// Sub-domain serving the identities endpoint on hosted organizations.
pub const IDENTITY_SUB_DOMAIN: &str = "vssps";

/// Search filter matching display names and account names.
pub const DEFAULT_SEARCH_FILTER: &str = "General";

impl BoardsClient {
    /// Searches identities by `filter_value` using `search_filter`
    /// (usually [`DEFAULT_SEARCH_FILTER`]).
    ///
    /// With `only_active`, inactive identities are dropped from the result.
    pub async fn get_identities(
        &self,
        filter_value: &str,
        only_active: bool,
        search_filter: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Identity>> {
        require_non_empty("search_filter", search_filter)?;
        require_non_empty("filter_value", filter_value)?;

        let url = self
            .url_for_sub_domain(IDENTITY_SUB_DOMAIN)?
            .for_identities()
            .with_query_parameter("searchFilter", search_filter)
            .with_query_parameter("filterValue", filter_value)
            .build(self.configuration().work_items_api_version());

        let mut identities: Vec<Identity> = self.fetch_list(url, cancel).await?;
        if only_active {
            identities.retain(|identity| identity.is_active);
        }
        Ok(identities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::test_support::client_with;
    use crate::api::traits::mocks::MockTransport;
    use crate::error::ClientError;
    use serde_json::json;

    fn identities_page() -> serde_json::Value {
        json!({
            "count": 2,
            "value": [
                {
                    "id": "6a6d2a5f-3c2b-4c5e-9b8a-1d2e3f4a5b6c",
                    "providerDisplayName": "Jane Doe",
                    "isActive": true
                },
                {
                    "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
                    "providerDisplayName": "Jane Former",
                    "isActive": false
                }
            ]
        })
    }

    /// # Active Identity Filtering
    ///
    /// Tests the identity search request and the local active filter.
    ///
    /// ## Test Scenario
    /// - The search returns one active and one inactive identity
    /// - The call asks for active identities only
    ///
    /// ## Expected Outcome
    /// - The request goes to the `vssps` sub-domain with both search parameters
    /// - Only the active identity is returned
    #[tokio::test]
    async fn test_only_active_identities() {
        let transport = MockTransport::new();
        transport.push_response(identities_page()).await;
        let client = client_with(&transport);

        let identities = client
            .get_identities("jane", true, DEFAULT_SEARCH_FILTER, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(identities.len(), 1);
        assert_eq!(identities[0].display_name, "Jane Doe");

        let requests = transport.requests().await;
        let url = &requests[0].url;
        assert_eq!(url.host_str(), Some("contoso.vssps.visualstudio.com"));
        assert_eq!(url.path(), "/_apis/identities");
        assert!(url.query().unwrap().starts_with("searchFilter=General&filterValue=jane"));
    }

    /// # Inactive Identities Kept
    ///
    /// Tests that inactive identities are returned when not filtering.
    ///
    /// ## Test Scenario
    /// - The service returns one active and one inactive identity
    /// - `only_active` is false
    ///
    /// ## Expected Outcome
    /// - Both identities are returned
    #[tokio::test]
    async fn test_all_identities_when_not_filtering() {
        let transport = MockTransport::new();
        transport.push_response(identities_page()).await;
        let client = client_with(&transport);

        let identities = client
            .get_identities("jane", false, DEFAULT_SEARCH_FILTER, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(identities.len(), 2);
    }

    /// # Empty Search Arguments
    ///
    /// Tests validation of the identity search arguments.
    ///
    /// ## Test Scenario
    /// - An empty filter value, then an empty search filter
    ///
    /// ## Expected Outcome
    /// - Each fails with an invalid argument naming the empty input
    /// - No request is sent
    #[tokio::test]
    async fn test_empty_filters_are_rejected() {
        let transport = MockTransport::new();
        let client = client_with(&transport);
        let cancel = CancellationToken::new();

        let no_value = client.get_identities("", false, DEFAULT_SEARCH_FILTER, &cancel).await;
        assert!(matches!(
            no_value,
            Err(ClientError::InvalidArgument { name: "filter_value", .. })
        ));

        let no_filter = client.get_identities("jane", false, "", &cancel).await;
        assert!(matches!(
            no_filter,
            Err(ClientError::InvalidArgument { name: "search_filter", .. })
        ));

        assert!(transport.requests().await.is_empty());
    }
}
