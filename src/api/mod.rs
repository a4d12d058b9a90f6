//! Boards REST client.
//!
//! [`BoardsClient`] covers work item queries and CRUD, pull requests,
//! identities and field metadata. Requests go through an [`HttpTransport`],
//! authenticated with a personal access token, against URLs produced by a
//! [`UrlBuilderFactory`] for either a hosted organization or an on-premises
//! collection.
//!
//! ## Features
//!
//! - Two-phase queries: run WIQL, then hydrate the matched work items in batches
//! - Pull request listing with server-side criteria and client-side filters
//! - Cooperative cancellation through a shared `CancellationToken`
//!
//! ## Example
//!
//! ```rust,no_run
//! use boards_client::BoardsClient;
//! use boards_client::models::PullRequestQuery;
//! use secrecy::SecretString;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BoardsClient::online("my-org", SecretString::from("my-pat".to_string()))?;
//!
//! let query = PullRequestQuery::none().with_status("active");
//! let prs = client
//!     .get_pull_requests("my-project", "my-repo", &query, &CancellationToken::new())
//!     .await?;
//! println!("Found {} pull requests", prs.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod credential;
mod identities;
mod mappers;
mod pull_requests;
mod traits;
mod url_builder;
mod work_items;

pub use client::BoardsClient;
pub use credential::PatCredential;
pub use identities::{DEFAULT_SEARCH_FILTER, IDENTITY_SUB_DOMAIN};
pub use traits::{
    HttpRequest, HttpTransport, JSON_CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE, ReqwestTransport,
};
pub use url_builder::{
    OnPremUrlBuilderFactory, OnlineUrlBuilderFactory, UrlBuilder, UrlBuilderFactory,
};

#[cfg(test)]
pub(crate) use client::test_support;
#[cfg(test)]
pub(crate) use traits::mocks;
