//! Normalization of work item query results.
//!
//! A query comes back either flat (a list of references) or hierarchical (a
//! list of links). The `queryType` discriminator is read first and the
//! document is only then deserialized into the matching shape, so a flat
//! document is never silently accepted as an empty tree or vice versa.

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::models::{ColumnReference, QueryType, WorkItemsQueryResult};

const QUERY_TYPE_KEY: &str = "queryType";
const FLAT_ITEMS_KEY: &str = "workItems";
const RELATIONS_KEY: &str = "workItemRelations";

/// How hydrated work items are projected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Every field plus relations and links.
    Expand,
    /// Only the listed field reference names. Empty means the server default.
    Fields(Vec<String>),
}

impl Projection {
    /// Projection for a query: the result's columns unless `expand` is set.
    pub fn from_columns(columns: &[ColumnReference], expand: bool) -> Self {
        if expand {
            Self::Expand
        } else {
            Self::Fields(
                columns
                    .iter()
                    .map(|column| column.reference_name.clone())
                    .collect(),
            )
        }
    }

    /// Value for the `fields` query parameter, if one should be sent.
    pub fn fields_parameter(&self) -> Option<String> {
        match self {
            Self::Fields(fields) if !fields.is_empty() => Some(fields.join(",")),
            _ => None,
        }
    }

    pub fn is_expand(&self) -> bool {
        matches!(self, Self::Expand)
    }
}

/// Everything the hydration phase needs to fetch a query's work items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationPlan {
    /// Distinct ids in first-seen order.
    pub ids: Vec<i32>,
    pub projection: Projection,
    pub as_of: Option<DateTime<Utc>>,
}

fn unknown_query_type(query_type: Option<String>) -> ClientError {
    ClientError::UnknownQueryType { query_type }
}

/// Parses a raw query response, dispatching on its `queryType`.
///
/// `flat` yields [`WorkItemsQueryResult::Flat`], `tree` and `oneHop` yield
/// [`WorkItemsQueryResult::Hierarchical`]. A missing or unrecognized
/// discriminator, or a document whose payload belongs to the other shape, is
/// reported as [`ClientError::UnknownQueryType`].
pub fn parse_query_result(document: Value) -> Result<WorkItemsQueryResult> {
    let Value::Object(mut object) = document else {
        return Err(unknown_query_type(None));
    };

    let raw = match object.get(QUERY_TYPE_KEY) {
        None | Some(Value::Null) => return Err(unknown_query_type(None)),
        Some(Value::String(raw)) => raw.clone(),
        Some(other) => return Err(unknown_query_type(Some(other.to_string()))),
    };
    let query_type = QueryType::parse(&raw).ok_or_else(|| unknown_query_type(Some(raw.clone())))?;

    let (expected, foreign) = if query_type.is_hierarchical() {
        (RELATIONS_KEY, FLAT_ITEMS_KEY)
    } else {
        (FLAT_ITEMS_KEY, RELATIONS_KEY)
    };
    let has_foreign_payload = object.get(foreign).is_some_and(|value| !value.is_null());
    if !object.contains_key(expected) && has_foreign_payload {
        return Err(unknown_query_type(Some(raw)));
    }

    object.insert(QUERY_TYPE_KEY.to_string(), serde_json::to_value(query_type)?);
    let document = Value::Object(object);

    let result = if query_type.is_hierarchical() {
        WorkItemsQueryResult::Hierarchical(serde_json::from_value(document)?)
    } else {
        WorkItemsQueryResult::Flat(serde_json::from_value(document)?)
    };
    Ok(result)
}

/// Distinct work item ids of a result, in first-seen order.
///
/// For hierarchical results each link contributes its source (when present)
/// then its target.
pub fn work_item_ids(result: &WorkItemsQueryResult) -> Vec<i32> {
    let ids: IndexSet<i32> = match result {
        WorkItemsQueryResult::Flat(flat) => flat.work_items.iter().map(|r| r.id).collect(),
        WorkItemsQueryResult::Hierarchical(tree) => tree
            .work_item_relations
            .iter()
            .flat_map(|link| {
                link.source
                    .iter()
                    .map(|source| source.id)
                    .chain(std::iter::once(link.target.id))
            })
            .collect(),
    };
    ids.into_iter().collect()
}

/// Plans hydration of a result, or `None` when it matched nothing.
pub fn plan_hydration(result: &WorkItemsQueryResult, expand: bool) -> Option<HydrationPlan> {
    let ids = work_item_ids(result);
    if ids.is_empty() {
        return None;
    }

    let metadata = result.metadata();
    Some(HydrationPlan {
        ids,
        projection: Projection::from_columns(&metadata.columns, expand),
        as_of: metadata.as_of,
    })
}
