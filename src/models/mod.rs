//! Data transfer objects exchanged with the service.
//!
//! All types deserialize from the service's camelCase JSON and tolerate
//! missing optional fields.

mod common;
mod identity;
mod pull_requests;
mod query;
mod work_items;

pub use common::{CollectionResponse, Project, Repository};
pub use identity::{Identity, IdentityReference, IdentityReferenceWithVote};
pub use pull_requests::{
    ListFilter, PullRequest, PullRequestComment, PullRequestIteration, PullRequestQuery,
    PullRequestThread,
};
pub use query::{
    ColumnReference, FlatQueryResult, HierarchicalQueryResult, QueryMetadata, QuerySource,
    QueryType, SortColumn, WorkItemLink, WorkItemReference, WorkItemsQuery,
    WorkItemsQueryResult, WorkItemsQueryResultWithWorkItems,
};
pub use work_items::{
    JsonPatchOperation, UpdateWorkItemRequest, WorkItem, WorkItemDeleteResponse, WorkItemField,
    WorkItemFieldUpdate, WorkItemRelation, WorkItemUpdate,
};
