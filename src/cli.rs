//! Command line interface of the `boards` binary.

use anyhow::{Context, Result};
use clap::{ArgGroup, Args as ClapArgs, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::api::{BoardsClient, DEFAULT_SEARCH_FILTER};
use crate::config::{ConnectionSettings, Settings};
use crate::error::ConfigError;
use crate::logging::LogConfig;
use crate::models::{PullRequestQuery, QuerySource, WorkItemsQuery};
use crate::parsed_property::ParsedProperty;
use crate::utils::parse_point_in_time;

#[derive(Parser, Debug, Clone)]
#[command(name = "boards", version, about = "Query work items, pull requests and identities")]
pub struct Args {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Hosted organization name (env: BOARDS_INSTANCE)
    #[arg(short, long, global = true, help_heading = "Connection")]
    pub instance: Option<String>,

    /// On-premises collection URL, overrides --instance (env: BOARDS_BASE_URL)
    #[arg(long, global = true, help_heading = "Connection")]
    pub base_url: Option<String>,

    /// Personal access token (env: BOARDS_PAT)
    #[arg(short = 't', long, global = true, help_heading = "Connection")]
    pub pat: Option<String>,

    /// Work items fetched per request (env: BOARDS_WORK_ITEMS_BATCH_SIZE)
    #[arg(long, global = true, help_heading = "Performance Tuning")]
    pub batch_size: Option<usize>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct LoggingArgs {
    /// trace, debug, info, warn or error; logging is off when unset
    #[arg(long, global = true, help_heading = "Logging")]
    pub log_level: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, help_heading = "Logging")]
    pub log_file: Option<PathBuf>,

    /// text or json
    #[arg(long, global = true, help_heading = "Logging")]
    pub log_format: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run a WIQL query or a saved query and print the matched work items
    #[command(group(ArgGroup::new("source").required(true).args(["wiql", "id"])))]
    Query {
        /// WIQL text
        wiql: Option<String>,

        /// Saved query id
        #[arg(long)]
        id: Option<Uuid>,

        /// Expect a tree or one-hop result
        #[arg(long)]
        hierarchical: bool,

        /// Fetch all fields and relations instead of the query columns
        #[arg(long)]
        expand: bool,
    },

    /// Fetch work items by id
    WorkItems {
        /// Comma separated ids
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<i32>,

        /// Field reference names to return
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Point in time, e.g. 2w or 2025-07-01
        #[arg(long)]
        as_of: Option<String>,

        /// Fetch all fields and relations
        #[arg(long, conflicts_with = "fields")]
        expand: bool,
    },

    /// List the pull requests of a repository
    PullRequests {
        project: String,
        repository: String,

        /// active, abandoned, completed or all
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        creator: Option<Uuid>,

        #[arg(long)]
        reviewer: Option<Uuid>,

        /// Only pull requests created since, e.g. 2w or 2025-07-01
        #[arg(long)]
        since: Option<String>,
    },

    /// Search identities
    Identities {
        filter_value: String,

        /// Drop inactive identities
        #[arg(long)]
        active: bool,

        #[arg(long, default_value = DEFAULT_SEARCH_FILTER)]
        search_filter: String,
    },
}

impl ConnectionArgs {
    /// Command line layer of the settings.
    pub fn to_settings(&self) -> Settings {
        let cli = |value: &String| ParsedProperty::Cli(value.clone(), value.clone());
        Settings {
            instance: self.instance.as_ref().map(cli),
            base_url: self.base_url.as_ref().map(cli),
            pat: self.pat.as_ref().map(cli),
            work_items_batch_size: self
                .batch_size
                .map(|v| ParsedProperty::Cli(v, v.to_string())),
            ..Settings::default()
        }
    }
}

impl Args {
    /// Resolves connection settings with precedence cli > env > file > default.
    pub fn resolve_settings(&self) -> Result<ConnectionSettings, ConfigError> {
        Settings::defaults()
            .merge(Settings::load_from_file()?)
            .merge(Settings::load_from_env())
            .merge(self.connection.to_settings())
            .resolve()
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig::from_sources(
            self.logging.log_level.as_deref(),
            self.logging.log_file.clone(),
            self.logging.log_format.as_deref(),
        )
    }
}

/// Runs a subcommand and returns its JSON output.
pub async fn execute(
    command: &Command,
    client: &BoardsClient,
    cancel: &CancellationToken,
) -> Result<Value> {
    let output = match command {
        Command::Query {
            wiql,
            id,
            hierarchical,
            expand,
        } => {
            let source = match (wiql, id) {
                (_, Some(id)) => QuerySource::Saved(*id),
                (Some(text), None) if *hierarchical => {
                    QuerySource::Wiql(WorkItemsQuery::hierarchical(text.as_str()))
                }
                (Some(text), None) => QuerySource::Wiql(WorkItemsQuery::new(text.as_str())),
                (None, None) => anyhow::bail!("either WIQL text or --id is required"),
            };
            let result = client
                .execute_query_and_expand(source, *expand, cancel)
                .await
                .context("Failed to run query")?;
            serde_json::to_value(result)?
        }
        Command::WorkItems {
            ids,
            fields,
            as_of,
            expand,
        } => {
            let as_of = as_of.as_deref().map(parse_point_in_time).transpose()?;
            let items = if *expand {
                client.get_work_items_expanded(ids, as_of, cancel).await
            } else {
                let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
                client.get_work_items(ids, as_of, &fields, cancel).await
            }
            .context("Failed to fetch work items")?;
            serde_json::to_value(items)?
        }
        Command::PullRequests {
            project,
            repository,
            status,
            creator,
            reviewer,
            since,
        } => {
            let mut query = PullRequestQuery::none();
            query.status = status.clone();
            query.creator_id = *creator;
            query.reviewer_id = *reviewer;
            query.created_after = since.as_deref().map(parse_point_in_time).transpose()?;

            let prs = client
                .get_pull_requests(project, repository, &query, cancel)
                .await
                .context("Failed to list pull requests")?;
            serde_json::to_value(prs)?
        }
        Command::Identities {
            filter_value,
            active,
            search_filter,
        } => {
            let identities = client
                .get_identities(filter_value, *active, search_filter, cancel)
                .await
                .context("Failed to search identities")?;
            serde_json::to_value(identities)?
        }
    };
    Ok(output)
}
