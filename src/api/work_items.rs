//! Work item queries and CRUD.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::client::{BoardsClient, require_non_empty};
use super::traits::HttpRequest;
use super::url_builder::UrlBuilder;
use crate::core::{HydrationPlan, Projection, fetch_in_batches, parse_query_result, run_and_hydrate};
use crate::error::{ClientError, Result};
use crate::models::{
    CollectionResponse, QuerySource, UpdateWorkItemRequest, WorkItem, WorkItemDeleteResponse, WorkItemField,
    WorkItemUpdate, WorkItemsQuery, WorkItemsQueryResult, WorkItemsQueryResultWithWorkItems,
};

fn format_as_of(as_of: DateTime<Utc>) -> String {
    as_of.to_rfc3339_opts(SecondsFormat::Secs, true)
}

trait ProjectionParameters {
    fn with_projection(self, projection: &Projection) -> Self;
    fn with_as_of(self, as_of: Option<DateTime<Utc>>) -> Self;
}

impl ProjectionParameters for UrlBuilder {
    fn with_projection(self, projection: &Projection) -> Self {
        if projection.is_expand() {
            self.with_query_parameter("$expand", "all")
        } else {
            self.with_optional_parameter("fields", projection.fields_parameter())
        }
    }

    fn with_as_of(self, as_of: Option<DateTime<Utc>>) -> Self {
        self.with_optional_parameter("asOf", as_of.map(format_as_of))
    }
}

fn projection_for(fields: &[&str]) -> Projection {
    Projection::Fields(fields.iter().map(|f| f.to_string()).collect())
}

impl BoardsClient {
    /// Runs a WIQL query and returns its result without hydrating it.
    ///
    /// The shape of the result follows the response's `queryType`; a mismatch
    /// with `query.is_hierarchical` is only logged.
    pub async fn execute_query(
        &self,
        query: &WorkItemsQuery,
        cancel: &CancellationToken,
    ) -> Result<WorkItemsQueryResult> {
        let request = self.query_request(&QuerySource::Wiql(query.clone()))?;
        let document = self.send_document(request, cancel).await?;
        let result = parse_query_result(document)?;

        if result.query_type().is_hierarchical() != query.is_hierarchical {
            warn!(
                expected_hierarchical = query.is_hierarchical,
                query_type = ?result.query_type(),
                "Query result shape differs from the caller's expectation"
            );
        }
        Ok(result)
    }

    /// Runs a WIQL query and hydrates the matched work items with the
    /// query's columns.
    pub async fn get_work_items_for_query(
        &self,
        query: &WorkItemsQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<WorkItem>> {
        let result = self
            .execute_query_and_expand(QuerySource::Wiql(query.clone()), false, cancel)
            .await?;
        Ok(result.into_work_items())
    }

    /// Runs a text or saved query, then hydrates every referenced work item.
    ///
    /// With `expand` the work items carry all fields and relations, otherwise
    /// only the query's columns. Hydration reads the work items as of the
    /// query's `asOf`.
    pub async fn execute_query_and_expand(
        &self,
        source: QuerySource,
        expand: bool,
        cancel: &CancellationToken,
    ) -> Result<WorkItemsQueryResultWithWorkItems> {
        let request = self.query_request(&source)?;
        run_and_hydrate(
            self.send_document(request, cancel),
            |plan| self.hydrate(plan, cancel),
            expand,
        )
        .await
    }

    fn query_request(&self, source: &QuerySource) -> Result<HttpRequest> {
        let api_version = self.configuration().work_items_api_version();
        match source {
            QuerySource::Wiql(query) => {
                require_non_empty("query", &query.query)?;
                let url = self.url()?.for_wiql().build(api_version);
                Ok(HttpRequest::post(url, serde_json::to_value(query)?))
            }
            QuerySource::Saved(id) => {
                if id.is_nil() {
                    return Err(ClientError::invalid_argument("query_id", "must not be nil"));
                }
                let url = self.url()?.for_saved_query(*id).build(api_version);
                Ok(HttpRequest::get(url))
            }
        }
    }

    async fn hydrate(&self, plan: HydrationPlan, cancel: &CancellationToken) -> Result<Vec<WorkItem>> {
        self.fetch_work_items(&plan.ids, plan.as_of, &plan.projection, cancel)
            .await
    }

    async fn fetch_work_items(
        &self,
        ids: &[i32],
        as_of: Option<DateTime<Utc>>,
        projection: &Projection,
        cancel: &CancellationToken,
    ) -> Result<Vec<WorkItem>> {
        let batch_size = self.configuration().work_items_batch_size();
        debug!(ids = ids.len(), batch_size, "Fetching work items");

        fetch_in_batches(
            ids,
            batch_size,
            |chunk| self.fetch_work_item_batch(chunk, as_of, projection, cancel),
            cancel,
        )
        .await
    }

    async fn fetch_work_item_batch(
        &self,
        chunk: Vec<i32>,
        as_of: Option<DateTime<Utc>>,
        projection: &Projection,
        cancel: &CancellationToken,
    ) -> Result<Option<CollectionResponse<WorkItem>>> {
        let url = self
            .url()?
            .for_work_items_batch(&chunk)
            .with_projection(projection)
            .with_as_of(as_of)
            .build(self.configuration().work_items_api_version());
        self.fetch_page(url, cancel).await
    }

    /// Fetches work items by id, in batches, with only `fields` (all fields
    /// when empty). An empty id list makes no request.
    pub async fn get_work_items(
        &self,
        ids: &[i32],
        as_of: Option<DateTime<Utc>>,
        fields: &[&str],
        cancel: &CancellationToken,
    ) -> Result<Vec<WorkItem>> {
        self.fetch_work_items(ids, as_of, &projection_for(fields), cancel)
            .await
    }

    /// Fetches work items by id with all fields and relations.
    pub async fn get_work_items_expanded(
        &self,
        ids: &[i32],
        as_of: Option<DateTime<Utc>>,
        cancel: &CancellationToken,
    ) -> Result<Vec<WorkItem>> {
        self.fetch_work_items(ids, as_of, &Projection::Expand, cancel)
            .await
    }

    /// Fetches one work item. `None` when the service returns no body.
    pub async fn get_work_item(
        &self,
        id: i32,
        as_of: Option<DateTime<Utc>>,
        fields: &[&str],
        cancel: &CancellationToken,
    ) -> Result<Option<WorkItem>> {
        self.fetch_work_item(id, as_of, &projection_for(fields), cancel)
            .await
    }

    /// Fetches one work item with all fields and relations.
    pub async fn get_work_item_expanded(
        &self,
        id: i32,
        as_of: Option<DateTime<Utc>>,
        cancel: &CancellationToken,
    ) -> Result<Option<WorkItem>> {
        self.fetch_work_item(id, as_of, &Projection::Expand, cancel)
            .await
    }

    async fn fetch_work_item(
        &self,
        id: i32,
        as_of: Option<DateTime<Utc>>,
        projection: &Projection,
        cancel: &CancellationToken,
    ) -> Result<Option<WorkItem>> {
        let url = self
            .url()?
            .for_work_item(id)
            .with_projection(projection)
            .with_as_of(as_of)
            .build(self.configuration().work_items_api_version());
        self.send(HttpRequest::get(url), cancel).await
    }

    /// Revision history of a work item, oldest first.
    pub async fn get_work_item_updates(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Vec<WorkItemUpdate>> {
        let url = self
            .url()?
            .for_work_item(id)
            .with_section("updates")
            .build(self.configuration().work_items_api_version());
        self.fetch_list(url, cancel).await
    }

    /// Creates a work item of `work_item_type` in `project` from the fields of
    /// `item`.
    pub async fn create_work_item(
        &self,
        project: &str,
        work_item_type: &str,
        item: &WorkItem,
        cancel: &CancellationToken,
    ) -> Result<WorkItem> {
        require_non_empty("project", project)?;
        require_non_empty("work_item_type", work_item_type)?;

        let url = self
            .url()?
            .with_section(project)
            .for_work_items()
            .with_section(format!("${}", work_item_type))
            .build(self.configuration().work_items_api_version());
        let body = serde_json::to_value(UpdateWorkItemRequest::from_fields(item).updates)?;
        self.send_required(HttpRequest::patch_document(Method::POST, url, body), cancel)
            .await
    }

    /// Applies a JSON-Patch document to an existing work item.
    pub async fn update_work_item(
        &self,
        request: &UpdateWorkItemRequest,
        cancel: &CancellationToken,
    ) -> Result<WorkItem> {
        let id = request
            .id
            .ok_or_else(|| ClientError::invalid_argument("id", "update request has no work item id"))?;

        let url = self
            .url()?
            .for_work_item(id)
            .build(self.configuration().work_items_api_version());
        let body = serde_json::to_value(&request.updates)?;
        self.send_required(HttpRequest::patch_document(Method::PATCH, url, body), cancel)
            .await
    }

    /// Deletes a work item; `destroy` removes it permanently instead of
    /// moving it to the recycle bin.
    pub async fn delete_work_item(
        &self,
        id: i32,
        destroy: bool,
        cancel: &CancellationToken,
    ) -> Result<Option<WorkItemDeleteResponse>> {
        let mut url = self.url()?.for_work_item(id);
        if destroy {
            url = url.with_query_parameter("destroy", true);
        }
        let url = url.build(self.configuration().work_items_api_version());
        self.send(HttpRequest::delete(url), cancel).await
    }

    /// Every field defined in the organization.
    pub async fn get_work_item_fields(&self, cancel: &CancellationToken) -> Result<Vec<WorkItemField>> {
        let url = self
            .url()?
            .for_work_item_fields()
            .build(self.configuration().work_items_api_version());
        self.fetch_list(url, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::test_support::{client_with, client_with_configuration};
    use crate::api::traits::JSON_PATCH_CONTENT_TYPE;
    use crate::api::traits::mocks::MockTransport;
    use crate::config::ClientConfiguration;
    use crate::error::ApiError;
    use crate::models::ColumnReference;
    use chrono::TimeZone;
    use serde_json::{Value, json};
    use uuid::Uuid;

    fn batch(ids: &[i32]) -> Value {
        json!({
            "count": ids.len(),
            "value": ids.iter().map(|id| json!({ "id": id, "rev": 1, "fields": {} })).collect::<Vec<_>>()
        })
    }

    fn query_param(url: &url::Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// # Dummy Query Hydration
    ///
    /// Tests the end-to-end run-and-hydrate flow for a flat query.
    ///
    /// ## Test Scenario
    /// - The query returns 3 references and 2 columns
    /// - The batch endpoint returns the 3 work items
    ///
    /// ## Expected Outcome
    /// - Two requests: POST to wiql, then one GET to the batch endpoint
    /// - The batch request carries ids 1,2,3 and both column names as fields
    /// - 3 work items are returned
    #[tokio::test]
    async fn test_get_work_items_for_query_hydrates_with_columns() {
        let transport = MockTransport::new();
        transport
            .push_response(json!({
                "queryType": "flat",
                "columns": [
                    { "name": "ID", "referenceName": "System.Id" },
                    { "name": "Title", "referenceName": "System.Title" }
                ],
                "workItems": [{ "id": 1 }, { "id": 2 }, { "id": 3 }]
            }))
            .await;
        transport.push_response(batch(&[1, 2, 3])).await;
        let client = client_with(&transport);

        let items = client
            .get_work_items_for_query(&WorkItemsQuery::new("Dummy query"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(items.len(), 3);
        let requests = transport.requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].url.path(), "/_apis/wit/wiql");
        assert_eq!(requests[0].body, Some(json!({ "query": "Dummy query" })));
        assert_eq!(requests[1].method, Method::GET);
        assert_eq!(query_param(&requests[1].url, "ids").as_deref(), Some("1,2,3"));
        assert_eq!(
            query_param(&requests[1].url, "fields").as_deref(),
            Some("System.Id,System.Title")
        );
    }

    /// # Dummy Query Keeps Metadata
    ///
    /// Tests that the hydrated result carries the query's metadata unchanged.
    ///
    /// ## Test Scenario
    /// - A flat query returns `asOf`, 2 columns, 1 sort column and 3 references
    /// - The batch endpoint returns the 3 work items with both fields set
    ///
    /// ## Expected Outcome
    /// - `asOf`, columns and sort columns equal the query's
    /// - 3 work items, each with 2 fields filled in
    #[tokio::test]
    async fn test_execute_query_and_expand_keeps_metadata() {
        let transport = MockTransport::new();
        transport
            .push_response(json!({
                "queryType": "flat",
                "asOf": "2024-05-01T10:00:00Z",
                "columns": [
                    { "name": "ID", "referenceName": "System.Id" },
                    { "name": "Title", "referenceName": "System.Title" }
                ],
                "sortColumns": [
                    { "field": { "name": "ID", "referenceName": "System.Id" }, "descending": true }
                ],
                "workItems": [{ "id": 1 }, { "id": 2 }, { "id": 3 }]
            }))
            .await;
        transport
            .push_response(json!({
                "count": 3,
                "value": (1..=3).map(|id| json!({
                    "id": id,
                    "rev": 1,
                    "fields": { "System.Id": id, "System.Title": format!("Item {id}") }
                })).collect::<Vec<_>>()
            }))
            .await;
        let client = client_with(&transport);

        let result = client
            .execute_query_and_expand(
                QuerySource::Wiql(WorkItemsQuery::new("Dummy query")),
                false,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(!result.is_hierarchical());
        let metadata = result.metadata();
        assert_eq!(
            metadata.as_of,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(
            metadata.columns,
            vec![
                ColumnReference::new("ID", "System.Id"),
                ColumnReference::new("Title", "System.Title"),
            ]
        );
        assert_eq!(metadata.sort_columns.len(), 1);
        assert_eq!(metadata.sort_columns[0].field.reference_name, "System.Id");
        assert!(metadata.sort_columns[0].descending);

        assert_eq!(result.work_items().len(), 3);
        for item in result.work_items() {
            assert_eq!(item.fields.len(), 2);
        }
        assert_eq!(result.work_items()[1].field_str("System.Title"), Some("Item 2"));
    }

    /// # Empty Query Result
    ///
    /// Tests that a query matching nothing skips hydration.
    ///
    /// ## Test Scenario
    /// - The flat query returns no references
    ///
    /// ## Expected Outcome
    /// - An empty list after exactly one request
    #[tokio::test]
    async fn test_empty_query_result_makes_one_request() {
        let transport = MockTransport::new();
        transport
            .push_response(json!({ "queryType": "flat", "workItems": [] }))
            .await;
        let client = client_with(&transport);

        let items = client
            .get_work_items_for_query(&WorkItemsQuery::new("q"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(items.is_empty());
        assert_eq!(transport.requests().await.len(), 1);
    }

    /// # Saved Hierarchical Query With Expand
    ///
    /// Tests a saved tree query hydrated with `$expand` and `asOf`.
    ///
    /// ## Test Scenario
    /// - A saved query returns a tree with a root row and two links
    /// - Expansion is requested
    ///
    /// ## Expected Outcome
    /// - The query is fetched with GET on the saved query id
    /// - The batch carries distinct ids, `$expand=all`, the query's `asOf` and
    ///   no `fields`
    /// - Links are preserved in the result
    #[tokio::test]
    async fn test_saved_tree_query_expanded() {
        let transport = MockTransport::new();
        transport
            .push_response(json!({
                "queryType": "tree",
                "asOf": "2024-05-01T10:00:00Z",
                "columns": [{ "name": "ID", "referenceName": "System.Id" }],
                "workItemRelations": [
                    { "target": { "id": 1 } },
                    { "rel": "Child", "source": { "id": 1 }, "target": { "id": 2 } },
                    { "rel": "Child", "source": { "id": 1 }, "target": { "id": 3 } }
                ]
            }))
            .await;
        transport.push_response(batch(&[1, 2, 3])).await;
        let client = client_with(&transport);
        let query_id = Uuid::parse_str("6a6d2a5f-3c2b-4c5e-9b8a-1d2e3f4a5b6c").unwrap();

        let result = client
            .execute_query_and_expand(QuerySource::Saved(query_id), true, &CancellationToken::new())
            .await
            .unwrap();

        let requests = transport.requests().await;
        assert_eq!(requests[0].method, Method::GET);
        assert!(requests[0].url.path().ends_with(&query_id.to_string()));
        let batch_url = &requests[1].url;
        assert_eq!(query_param(batch_url, "ids").as_deref(), Some("1,2,3"));
        assert_eq!(query_param(batch_url, "$expand").as_deref(), Some("all"));
        assert_eq!(
            query_param(batch_url, "asOf").as_deref(),
            Some("2024-05-01T10:00:00Z")
        );
        assert_eq!(query_param(batch_url, "fields"), None);

        match result {
            WorkItemsQueryResultWithWorkItems::Hierarchical {
                work_item_relations,
                work_items,
                ..
            } => {
                assert_eq!(work_item_relations.len(), 3);
                assert_eq!(work_items.len(), 3);
            }
            other => panic!("expected hierarchical result, got {:?}", other),
        }
    }

    /// # Unknown Query Type
    ///
    /// Tests that an unrecognized `queryType` is surfaced as its own error.
    ///
    /// ## Test Scenario
    /// - The query returns `queryType: matrix`
    ///
    /// ## Expected Outcome
    /// - Fails with an unknown-query-type error
    #[tokio::test]
    async fn test_execute_query_reports_unknown_type() {
        let transport = MockTransport::new();
        transport
            .push_response(json!({ "queryType": "matrix", "workItems": [] }))
            .await;
        let client = client_with(&transport);

        let result = client
            .execute_query(&WorkItemsQuery::new("q"), &CancellationToken::new())
            .await;

        assert!(result.unwrap_err().is_unknown_query_type());
    }

    /// # Hierarchical Shape Without Hydration
    ///
    /// Tests that `execute_query` returns links without fetching work items.
    ///
    /// ## Test Scenario
    /// - The query returns a one-hop result with one link
    ///
    /// ## Expected Outcome
    /// - The result is hierarchical after a single request
    #[tokio::test]
    async fn test_execute_query_returns_hierarchical_shape() {
        let transport = MockTransport::new();
        transport
            .push_response(json!({
                "queryType": "oneHop",
                "workItemRelations": [{ "source": { "id": 1 }, "target": { "id": 2 } }]
            }))
            .await;
        let client = client_with(&transport);

        let result = client
            .execute_query(&WorkItemsQuery::new("q"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(result, WorkItemsQueryResult::Hierarchical(_)));
        assert_eq!(transport.requests().await.len(), 1);
    }

    /// # Invalid Arguments
    ///
    /// Tests that bad arguments fail before any request is sent.
    ///
    /// ## Test Scenario
    /// - Empty query text, nil saved query id, empty project, empty type
    ///   and an update without an id
    ///
    /// ## Expected Outcome
    /// - Each call fails with `InvalidArgument`
    /// - The transport records no request
    #[tokio::test]
    async fn test_invalid_arguments_send_nothing() {
        let transport = MockTransport::new();
        let client = client_with(&transport);
        let cancel = CancellationToken::new();

        let results = vec![
            client
                .execute_query(&WorkItemsQuery::new("  "), &cancel)
                .await
                .map(|_| ()),
            client
                .execute_query_and_expand(QuerySource::Saved(Uuid::nil()), false, &cancel)
                .await
                .map(|_| ()),
            client
                .create_work_item("", "Bug", &WorkItem::new(0), &cancel)
                .await
                .map(|_| ()),
            client
                .create_work_item("proj", "", &WorkItem::new(0), &cancel)
                .await
                .map(|_| ()),
            client
                .update_work_item(&UpdateWorkItemRequest::default(), &cancel)
                .await
                .map(|_| ()),
        ];

        for result in results {
            assert!(matches!(result, Err(ClientError::InvalidArgument { .. })));
        }
        assert!(transport.requests().await.is_empty());
    }

    /// # Batched Id Fetch
    ///
    /// Tests that ids are fetched in configured batch sizes.
    ///
    /// ## Test Scenario
    /// - Batch size 2, ids 1 to 5, explicit fields and an `asOf`
    ///
    /// ## Expected Outcome
    /// - Three requests with 2, 2 and 1 ids
    /// - Each carries the fields and `asOf` parameters
    #[tokio::test]
    async fn test_get_work_items_in_batches() {
        let transport = MockTransport::new();
        transport.push_response(batch(&[1, 2])).await;
        transport.push_response(batch(&[3, 4])).await;
        transport.push_response(batch(&[5])).await;
        let client = client_with_configuration(
            &transport,
            ClientConfiguration::new("4.1", "4.1", 2).unwrap(),
        );
        let as_of = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let items = client
            .get_work_items(&[1, 2, 3, 4, 5], Some(as_of), &["System.Title"], &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(items.iter().map(|w| w.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        let requests = transport.requests().await;
        let id_lists: Vec<String> = requests
            .iter()
            .map(|r| query_param(&r.url, "ids").unwrap())
            .collect();
        assert_eq!(id_lists, vec!["1,2", "3,4", "5"]);
        for request in &requests {
            assert_eq!(query_param(&request.url, "fields").as_deref(), Some("System.Title"));
            assert_eq!(
                query_param(&request.url, "asOf").as_deref(),
                Some("2024-01-02T03:04:05Z")
            );
        }
    }

    /// # No Ids
    ///
    /// Tests that an empty id list makes no request.
    ///
    /// ## Test Scenario
    /// - Requests expanded work items for no ids
    ///
    /// ## Expected Outcome
    /// - An empty list and no recorded request
    #[tokio::test]
    async fn test_get_work_items_with_no_ids_makes_no_request() {
        let transport = MockTransport::new();
        let client = client_with(&transport);

        let items = client
            .get_work_items_expanded(&[], None, &CancellationToken::new())
            .await
            .unwrap();

        assert!(items.is_empty());
        assert!(transport.requests().await.is_empty());
    }

    /// # Single Work Item
    ///
    /// Tests fetching one work item, expanded and absent.
    ///
    /// ## Test Scenario
    /// - Item 9 is returned with a title; item 10 gets an empty body
    ///
    /// ## Expected Outcome
    /// - Item 9 is returned with `$expand=all`
    /// - Item 10 is `None` and its request has no `fields`
    #[tokio::test]
    async fn test_get_work_item_single_and_absent() {
        let transport = MockTransport::new();
        transport
            .push_response(json!({ "id": 9, "rev": 3, "fields": { "System.Title": "Nine" } }))
            .await;
        let client = client_with(&transport);
        let cancel = CancellationToken::new();

        let item = client
            .get_work_item_expanded(9, None, &cancel)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(item.field_str("System.Title"), Some("Nine"));

        let absent = client.get_work_item(10, None, &[], &cancel).await.unwrap();
        assert!(absent.is_none());

        let requests = transport.requests().await;
        assert_eq!(requests[0].url.path(), "/_apis/wit/workitems/9");
        assert_eq!(query_param(&requests[0].url, "$expand").as_deref(), Some("all"));
        assert_eq!(query_param(&requests[1].url, "fields"), None);
    }

    /// # Updates And Field Metadata
    ///
    /// Tests the revision history and field definition endpoints.
    ///
    /// ## Test Scenario
    /// - Work item 4 has one update changing its state
    /// - The fields endpoint returns an empty body
    ///
    /// ## Expected Outcome
    /// - One update with a changed `System.State`
    /// - No fields, and both requests hit the expected paths
    #[tokio::test]
    async fn test_work_item_updates_and_fields() {
        let transport = MockTransport::new();
        transport
            .push_response(json!({
                "count": 1,
                "value": [{
                    "id": 1,
                    "workItemId": 4,
                    "rev": 1,
                    "fields": { "System.State": { "newValue": "New" } }
                }]
            }))
            .await;
        let client = client_with(&transport);
        let cancel = CancellationToken::new();

        let updates = client.get_work_item_updates(4, &cancel).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert!(updates[0].field("System.State").is_value_changed());

        let fields = client.get_work_item_fields(&cancel).await.unwrap();
        assert!(fields.is_empty());

        let requests = transport.requests().await;
        assert_eq!(requests[0].url.path(), "/_apis/wit/workitems/4/updates");
        assert_eq!(requests[1].url.path(), "/_apis/wit/fields");
    }

    /// # Create And Update
    ///
    /// Tests the JSON-Patch requests used to create and update work items.
    ///
    /// ## Test Scenario
    /// - Creates a Bug with a title, then updates its state
    ///
    /// ## Expected Outcome
    /// - Create is a POST to `{project}/_apis/wit/workitems/$Bug`
    /// - Update is a PATCH to `_apis/wit/workitems/{id}`
    /// - Both bodies are JSON-Patch documents
    #[tokio::test]
    async fn test_create_and_update_work_item() {
        let transport = MockTransport::new();
        transport
            .push_response(json!({ "id": 77, "rev": 1, "fields": { "System.Title": "Crash" } }))
            .await;
        transport
            .push_response(json!({ "id": 77, "rev": 2, "fields": { "System.State": "Active" } }))
            .await;
        let client = client_with(&transport);
        let cancel = CancellationToken::new();

        let created = client
            .create_work_item(
                "proj",
                "Bug",
                &WorkItem::new(0).with_field("System.Title", "Crash"),
                &cancel,
            )
            .await
            .unwrap();
        assert_eq!(created.id, 77);

        let mut update = UpdateWorkItemRequest::new(77);
        update.add_field_value("System.State", "Active");
        let updated = client.update_work_item(&update, &cancel).await.unwrap();
        assert_eq!(updated.rev, 2);

        let requests = transport.requests().await;
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].url.path(), "/proj/_apis/wit/workitems/$Bug");
        assert_eq!(requests[0].content_type, JSON_PATCH_CONTENT_TYPE);
        assert_eq!(
            requests[0].body,
            Some(json!([{ "op": "add", "path": "/fields/System.Title", "value": "Crash" }]))
        );
        assert_eq!(requests[1].method, Method::PATCH);
        assert_eq!(requests[1].url.path(), "/_apis/wit/workitems/77");
    }

    /// # Delete Destroy Flag
    ///
    /// Tests that `destroy` is only sent when requested.
    ///
    /// ## Test Scenario
    /// - Deletes item 5 with destroy, then item 6 without
    ///
    /// ## Expected Outcome
    /// - The first request carries `destroy=true`, the second none
    #[tokio::test]
    async fn test_delete_work_item_destroy_flag() {
        let transport = MockTransport::new();
        transport
            .push_response(json!({ "id": 5, "code": 200, "deletedBy": "me" }))
            .await;
        let client = client_with(&transport);
        let cancel = CancellationToken::new();

        let deleted = client.delete_work_item(5, true, &cancel).await.unwrap();
        assert_eq!(deleted.map(|d| d.code), Some(200));
        client.delete_work_item(6, false, &cancel).await.unwrap();

        let requests = transport.requests().await;
        assert_eq!(requests[0].method, Method::DELETE);
        assert_eq!(query_param(&requests[0].url, "destroy").as_deref(), Some("true"));
        assert_eq!(query_param(&requests[1].url, "destroy"), None);
    }

    /// # Hydration Failure
    ///
    /// Tests that a transport error during hydration reaches the caller.
    ///
    /// ## Test Scenario
    /// - The query succeeds and the batch fetch is unauthorized
    ///
    /// ## Expected Outcome
    /// - Fails with `ApiError::Unauthorized`
    #[tokio::test]
    async fn test_transport_error_propagates_from_hydration() {
        let transport = MockTransport::new();
        transport
            .push_response(json!({ "queryType": "flat", "workItems": [{ "id": 1 }] }))
            .await;
        transport.push_error(ApiError::Unauthorized).await;
        let client = client_with(&transport);

        let result = client
            .get_work_items_for_query(&WorkItemsQuery::new("q"), &CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(ClientError::Api(ApiError::Unauthorized))
        ));
    }
}
