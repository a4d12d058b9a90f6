//! Work item query requests and the two shapes of their results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::work_items::WorkItem;

/// Minimal pointer to a work item. Equality is by `id` only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemReference {
    pub id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl WorkItemReference {
    pub fn new(id: i32) -> Self {
        Self { id, url: None }
    }
}

impl PartialEq for WorkItemReference {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for WorkItemReference {}

impl std::hash::Hash for WorkItemReference {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Directed edge of a hierarchical query result.
///
/// Root rows of a tree query have no source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItemLink {
    #[serde(default)]
    pub rel: Option<String>,
    #[serde(default)]
    pub source: Option<WorkItemReference>,
    pub target: WorkItemReference,
}

impl WorkItemLink {
    pub fn new(source: WorkItemReference, target: WorkItemReference, rel: impl Into<String>) -> Self {
        Self {
            rel: Some(rel.into()),
            source: Some(source),
            target,
        }
    }
}

/// A requested field of a query result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnReference {
    #[serde(default)]
    pub name: String,
    pub reference_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ColumnReference {
    pub fn new(name: impl Into<String>, reference_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference_name: reference_name.into(),
            url: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortColumn {
    pub field: ColumnReference,
    #[serde(default)]
    pub descending: bool,
}

/// The `queryType` discriminator of a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryType {
    Flat,
    Tree,
    OneHop,
}

impl QueryType {
    /// Parses a discriminator, ignoring ASCII case.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("flat") {
            Some(Self::Flat)
        } else if s.eq_ignore_ascii_case("tree") {
            Some(Self::Tree)
        } else if s.eq_ignore_ascii_case("oneHop") {
            Some(Self::OneHop)
        } else {
            None
        }
    }

    /// True for the shapes that carry links instead of references.
    pub fn is_hierarchical(self) -> bool {
        !matches!(self, Self::Flat)
    }
}

/// Metadata shared by every query result shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetadata {
    pub query_type: QueryType,
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    #[serde(default)]
    pub columns: Vec<ColumnReference>,
    #[serde(default)]
    pub sort_columns: Vec<SortColumn>,
}

impl QueryMetadata {
    pub fn new(query_type: QueryType) -> Self {
        Self {
            query_type,
            as_of: None,
            columns: Vec::new(),
            sort_columns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatQueryResult {
    #[serde(flatten)]
    pub metadata: QueryMetadata,
    #[serde(default)]
    pub work_items: Vec<WorkItemReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchicalQueryResult {
    #[serde(flatten)]
    pub metadata: QueryMetadata,
    #[serde(default)]
    pub work_item_relations: Vec<WorkItemLink>,
}

/// Result of executing a work item query.
///
/// Built by [`crate::core::reconcile::parse_query_result`], which reads the
/// `queryType` discriminator before committing to a shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WorkItemsQueryResult {
    Flat(FlatQueryResult),
    Hierarchical(HierarchicalQueryResult),
}

impl WorkItemsQueryResult {
    pub fn metadata(&self) -> &QueryMetadata {
        match self {
            Self::Flat(flat) => &flat.metadata,
            Self::Hierarchical(tree) => &tree.metadata,
        }
    }

    pub fn query_type(&self) -> QueryType {
        self.metadata().query_type
    }

    /// Attaches hydrated work items, keeping the shape and metadata.
    pub fn with_work_items(self, work_items: Vec<WorkItem>) -> WorkItemsQueryResultWithWorkItems {
        match self {
            Self::Flat(flat) => WorkItemsQueryResultWithWorkItems::Flat {
                metadata: flat.metadata,
                work_items,
            },
            Self::Hierarchical(tree) => WorkItemsQueryResultWithWorkItems::Hierarchical {
                metadata: tree.metadata,
                work_item_relations: tree.work_item_relations,
                work_items,
            },
        }
    }
}

/// A query result with its matched work items hydrated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum WorkItemsQueryResultWithWorkItems {
    Flat {
        #[serde(flatten)]
        metadata: QueryMetadata,
        work_items: Vec<WorkItem>,
    },
    Hierarchical {
        #[serde(flatten)]
        metadata: QueryMetadata,
        work_item_relations: Vec<WorkItemLink>,
        work_items: Vec<WorkItem>,
    },
}

impl WorkItemsQueryResultWithWorkItems {
    pub fn metadata(&self) -> &QueryMetadata {
        match self {
            Self::Flat { metadata, .. } | Self::Hierarchical { metadata, .. } => metadata,
        }
    }

    pub fn work_items(&self) -> &[WorkItem] {
        match self {
            Self::Flat { work_items, .. } | Self::Hierarchical { work_items, .. } => work_items,
        }
    }

    pub fn into_work_items(self) -> Vec<WorkItem> {
        match self {
            Self::Flat { work_items, .. } | Self::Hierarchical { work_items, .. } => work_items,
        }
    }

    pub fn is_hierarchical(&self) -> bool {
        matches!(self, Self::Hierarchical { .. })
    }
}

/// A WIQL query to execute.
///
/// `is_hierarchical` records what the caller expects back; the shape actually
/// parsed is decided by the response's `queryType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkItemsQuery {
    pub query: String,
    #[serde(skip)]
    pub is_hierarchical: bool,
}

impl WorkItemsQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            is_hierarchical: false,
        }
    }

    pub fn hierarchical(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            is_hierarchical: true,
        }
    }
}

/// Where a query to run and hydrate comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// Inline WIQL text.
    Wiql(WorkItemsQuery),
    /// A saved query, referenced by id.
    Saved(Uuid),
}

impl From<WorkItemsQuery> for QuerySource {
    fn from(query: WorkItemsQuery) -> Self {
        Self::Wiql(query)
    }
}

impl From<Uuid> for QuerySource {
    fn from(id: Uuid) -> Self {
        Self::Saved(id)
    }
}
