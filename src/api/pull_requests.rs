//! Pull request listing and details.

use tokio_util::sync::CancellationToken;

use super::client::{BoardsClient, require_non_empty};
use super::traits::HttpRequest;
use crate::core::paginate;
use crate::error::Result;
use crate::models::{
    CollectionResponse, PullRequest, PullRequestIteration, PullRequestQuery, PullRequestThread,
};

fn require_repository(project: &str, repository: &str) -> Result<()> {
    require_non_empty("project", project)?;
    require_non_empty("repository", repository)
}

impl BoardsClient {
    /// Lists every pull request of a repository matching `query`.
    ///
    /// Status, creator and reviewer are sent to the server. The creation date
    /// bound and the custom filter are applied to each page as it arrives;
    /// listing stops at the first empty page, or at the first page reaching
    /// past the date bound.
    pub async fn get_pull_requests(
        &self,
        project: &str,
        repository: &str,
        query: &PullRequestQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<PullRequest>> {
        require_repository(project, repository)?;

        let filter = query.list_filter();
        paginate(
            |skip| self.fetch_pull_request_page(project, repository, query, skip, cancel),
            &filter,
            cancel,
        )
        .await
    }

    async fn fetch_pull_request_page(
        &self,
        project: &str,
        repository: &str,
        query: &PullRequestQuery,
        skip: usize,
        cancel: &CancellationToken,
    ) -> Result<Option<CollectionResponse<PullRequest>>> {
        let url = self
            .url()?
            .for_pull_requests(project, repository)
            .with_optional_parameter("searchCriteria.status", query.status.as_deref())
            .with_optional_parameter("searchCriteria.reviewerId", query.reviewer_id)
            .with_optional_parameter("searchCriteria.creatorId", query.creator_id)
            .with_query_parameter("$skip", skip)
            .build(self.configuration().pull_requests_api_version());
        self.fetch_page(url, cancel).await
    }

    pub async fn get_pull_request(
        &self,
        project: &str,
        repository: &str,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Option<PullRequest>> {
        require_repository(project, repository)?;

        let url = self
            .url()?
            .for_pull_request(project, repository, id)
            .build(self.configuration().pull_requests_api_version());
        self.send(HttpRequest::get(url), cancel).await
    }

    /// Fetches a pull request without knowing its repository.
    pub async fn get_pull_request_by_id(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Option<PullRequest>> {
        let url = self
            .url()?
            .for_pull_request_by_id(id)
            .build(self.configuration().pull_requests_api_version());
        self.send(HttpRequest::get(url), cancel).await
    }

    pub async fn get_pull_request_iterations(
        &self,
        project: &str,
        repository: &str,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Vec<PullRequestIteration>> {
        require_repository(project, repository)?;

        let url = self.pull_request_section(project, repository, id, "iterations")?;
        self.fetch_list(url, cancel).await
    }

    /// Comment threads of a pull request, including system threads.
    pub async fn get_pull_request_threads(
        &self,
        project: &str,
        repository: &str,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Vec<PullRequestThread>> {
        require_repository(project, repository)?;

        let url = self.pull_request_section(project, repository, id, "threads")?;
        self.fetch_list(url, cancel).await
    }

    fn pull_request_section(
        &self,
        project: &str,
        repository: &str,
        id: i32,
        section: &str,
    ) -> Result<url::Url> {
        Ok(self
            .url()?
            .for_pull_request(project, repository, id)
            .with_section(section)
            .build(self.configuration().pull_requests_api_version()))
    }
}
