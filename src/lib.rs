//! # Boards Client Library
//!
//! An async client for work tracking and code review services in the Azure
//! DevOps / VSTS style. This library provides:
//!
//! - WIQL queries, flat and hierarchical, with work item hydration
//! - Work item CRUD, revision history and field metadata
//! - Pull request listing, iterations and threads
//! - Identity search
//! - Layered configuration and `tracing` based logging for the CLI
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use boards_client::BoardsClient;
//! use boards_client::models::{QuerySource, WorkItemsQuery};
//! use secrecy::SecretString;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BoardsClient::online("my-org", SecretString::from("my-pat".to_string()))?;
//!
//! let query = WorkItemsQuery::hierarchical(
//!     "SELECT [System.Id] FROM WorkItemLinks WHERE [System.Links.LinkType] = 'Child'",
//! );
//! let result = client
//!     .execute_query_and_expand(QuerySource::Wiql(query), true, &CancellationToken::new())
//!     .await?;
//! println!("Found {} work items", result.work_items().len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod parsed_property;
pub mod utils;

// Re-export commonly used types for convenience
pub use api::BoardsClient;
pub use config::{ClientConfiguration, Settings};
pub use error::{ApiError, ClientError, ConfigError, Result};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
