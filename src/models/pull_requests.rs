use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::common::Repository;
use super::identity::{IdentityReference, IdentityReferenceWithVote};
use crate::core::pagination::CreationDated;

/// A pull request. Two pull requests are equal when their ids match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_request_id: i32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_by: Option<IdentityReference>,
    #[serde(default)]
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub closed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source_ref_name: Option<String>,
    #[serde(default)]
    pub target_ref_name: Option<String>,
    #[serde(default)]
    pub merge_status: Option<String>,
    #[serde(default)]
    pub merge_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub repository: Option<Repository>,
    #[serde(default)]
    pub reviewers: Vec<IdentityReferenceWithVote>,
}

impl PartialEq for PullRequest {
    fn eq(&self, other: &Self) -> bool {
        self.pull_request_id == other.pull_request_id
    }
}

impl Eq for PullRequest {}

impl CreationDated for PullRequest {
    fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestIteration {
    pub id: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<IdentityReference>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestThread {
    pub id: i32,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub comments: Vec<PullRequestComment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestComment {
    pub id: i32,
    #[serde(default)]
    pub parent_comment_id: i32,
    #[serde(default)]
    pub author: Option<IdentityReference>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comment_type: Option<String>,
}

/// Search criteria for [`crate::BoardsClient::get_pull_requests`].
///
/// Every field is optional; an unset field places no constraint. `status`,
/// `creator_id` and `reviewer_id` are sent to the server, `created_after` and
/// `custom_filter` are applied locally to each page.
#[derive(Clone, Default)]
pub struct PullRequestQuery {
    pub creator_id: Option<Uuid>,
    pub reviewer_id: Option<Uuid>,
    pub status: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub custom_filter: Option<Arc<dyn Fn(&PullRequest) -> bool + Send + Sync>>,
}

impl PullRequestQuery {
    /// A query with no constraints.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_creator(mut self, creator_id: Uuid) -> Self {
        self.creator_id = Some(creator_id);
        self
    }

    pub fn with_reviewer(mut self, reviewer_id: Uuid) -> Self {
        self.reviewer_id = Some(reviewer_id);
        self
    }

    pub fn created_after(mut self, bound: DateTime<Utc>) -> Self {
        self.created_after = Some(bound);
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&PullRequest) -> bool + Send + Sync + 'static,
    {
        self.custom_filter = Some(Arc::new(filter));
        self
    }

    /// The locally applied part of this query.
    pub fn list_filter(&self) -> ListFilter<PullRequest> {
        ListFilter {
            created_after: self.created_after,
            custom_filter: self.custom_filter.clone(),
        }
    }
}

impl fmt::Debug for PullRequestQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullRequestQuery")
            .field("creator_id", &self.creator_id)
            .field("reviewer_id", &self.reviewer_id)
            .field("status", &self.status)
            .field("created_after", &self.created_after)
            .field("custom_filter", &self.custom_filter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Client-side filter applied by the pagination loop to every raw page.
pub struct ListFilter<T> {
    /// Keep items created at or after this instant.
    pub created_after: Option<DateTime<Utc>>,
    /// Arbitrary predicate applied after the date filter.
    pub custom_filter: Option<Arc<dyn Fn(&T) -> bool + Send + Sync>>,
}

impl<T> ListFilter<T> {
    pub fn none() -> Self {
        Self {
            created_after: None,
            custom_filter: None,
        }
    }
}

impl<T> Default for ListFilter<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> Clone for ListFilter<T> {
    fn clone(&self) -> Self {
        Self {
            created_after: self.created_after,
            custom_filter: self.custom_filter.clone(),
        }
    }
}
