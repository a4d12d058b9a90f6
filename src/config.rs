//! Client configuration and connection settings.
//!
//! [`ClientConfiguration`] holds the knobs the client itself uses (API versions
//! and the work item batch size). [`Settings`] describes how to connect and is
//! assembled from several sources, each value remembering where it came from:
//!
//! - TOML file at `$XDG_CONFIG_HOME/boards/config.toml`
//! - `BOARDS_*` environment variables
//! - command line flags (filled in by the CLI)
//!
//! ## Example
//!
//! ```rust,no_run
//! use boards_client::config::Settings;
//!
//! let settings = Settings::load_from_file()?
//!     .merge(Settings::load_from_env());
//! let connection = settings.resolve()?;
//! println!("batch size: {}", connection.configuration.work_items_batch_size());
//! # Ok::<(), boards_client::error::ConfigError>(())
//! ```

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;
use crate::parsed_property::ParsedProperty;

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "4.1";
/// Work item ids requested per batch when none is configured.
pub const DEFAULT_WORK_ITEMS_BATCH_SIZE: usize = 400;

/// Settings the client consults on every call.
///
/// Immutable once built; use [`crate::BoardsClient::with_configuration`] to
/// get a client with different settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfiguration {
    work_items_api_version: String,
    pull_requests_api_version: String,
    work_items_batch_size: usize,
}

impl Default for ClientConfiguration {
    fn default() -> Self {
        Self {
            work_items_api_version: DEFAULT_API_VERSION.to_string(),
            pull_requests_api_version: DEFAULT_API_VERSION.to_string(),
            work_items_batch_size: DEFAULT_WORK_ITEMS_BATCH_SIZE,
        }
    }
}

impl ClientConfiguration {
    pub fn new(
        work_items_api_version: impl Into<String>,
        pull_requests_api_version: impl Into<String>,
        work_items_batch_size: usize,
    ) -> Result<Self, ConfigError> {
        let configuration = Self {
            work_items_api_version: work_items_api_version.into(),
            pull_requests_api_version: pull_requests_api_version.into(),
            work_items_batch_size,
        };
        configuration.validate()?;
        Ok(configuration)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.work_items_api_version.trim().is_empty() {
            return Err(invalid("work_items_api_version", "must not be empty"));
        }
        if self.pull_requests_api_version.trim().is_empty() {
            return Err(invalid("pull_requests_api_version", "must not be empty"));
        }
        if self.work_items_batch_size == 0 {
            return Err(invalid("work_items_batch_size", "must be greater than zero"));
        }
        Ok(())
    }

    pub fn work_items_api_version(&self) -> &str {
        &self.work_items_api_version
    }

    pub fn pull_requests_api_version(&self) -> &str {
        &self.pull_requests_api_version
    }

    pub fn work_items_batch_size(&self) -> usize {
        self.work_items_batch_size
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Where the service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceTarget {
    /// A hosted organization, `https://{instance}.visualstudio.com`.
    Online { instance: String },
    /// An on-premises collection URL.
    OnPrem { base_url: Url },
}

/// Fully validated settings, ready to build a client from.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub target: ServiceTarget,
    pub pat: SecretString,
    pub configuration: ClientConfiguration,
}

/// Shape of the TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    pub instance: Option<String>,
    pub base_url: Option<String>,
    pub pat: Option<String>,
    pub work_items_api_version: Option<String>,
    pub pull_requests_api_version: Option<String>,
    pub work_items_batch_size: Option<usize>,
}

/// Connection settings assembled from file, environment and command line.
#[derive(Clone, Default, PartialEq)]
pub struct Settings {
    /// Hosted organization name.
    pub instance: Option<ParsedProperty<String>>,
    /// On-premises collection URL; takes priority over `instance`.
    pub base_url: Option<ParsedProperty<String>>,
    /// Personal access token.
    pub pat: Option<ParsedProperty<String>>,
    pub work_items_api_version: Option<ParsedProperty<String>>,
    pub pull_requests_api_version: Option<ParsedProperty<String>>,
    pub work_items_batch_size: Option<ParsedProperty<usize>>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("instance", &self.instance)
            .field("base_url", &self.base_url)
            .field("pat", &self.pat.as_ref().map(|p| p.source_name()))
            .field("work_items_api_version", &self.work_items_api_version)
            .field("pull_requests_api_version", &self.pull_requests_api_version)
            .field("work_items_batch_size", &self.work_items_batch_size)
            .finish()
    }
}

fn env_string(name: &str) -> Option<ParsedProperty<String>> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| ParsedProperty::Env(v.clone(), v))
}

impl Settings {
    /// Built-in defaults for everything that has one.
    pub fn defaults() -> Self {
        Self {
            work_items_api_version: Some(ParsedProperty::Default(DEFAULT_API_VERSION.to_string())),
            pull_requests_api_version: Some(ParsedProperty::Default(
                DEFAULT_API_VERSION.to_string(),
            )),
            work_items_batch_size: Some(ParsedProperty::Default(DEFAULT_WORK_ITEMS_BATCH_SIZE)),
            ..Self::default()
        }
    }

    /// Loads the XDG config file. A missing file yields empty settings.
    pub fn load_from_file() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::config_path()?)
    }

    /// Loads settings from a specific TOML file. A missing file yields empty
    /// settings.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let from_file =
            |value: String| ParsedProperty::File(value.clone(), path.to_path_buf(), value);
        Ok(Self {
            instance: file.instance.map(from_file),
            base_url: file.base_url.map(from_file),
            pat: file.pat.map(from_file),
            work_items_api_version: file.work_items_api_version.map(from_file),
            pull_requests_api_version: file.pull_requests_api_version.map(from_file),
            work_items_batch_size: file
                .work_items_batch_size
                .map(|v| ParsedProperty::File(v, path.to_path_buf(), v.to_string())),
        })
    }

    /// Reads `BOARDS_*` environment variables. Unparsable numbers are ignored.
    pub fn load_from_env() -> Self {
        Self {
            instance: env_string("BOARDS_INSTANCE"),
            base_url: env_string("BOARDS_BASE_URL"),
            pat: env_string("BOARDS_PAT"),
            work_items_api_version: env_string("BOARDS_WORK_ITEMS_API_VERSION"),
            pull_requests_api_version: env_string("BOARDS_PULL_REQUESTS_API_VERSION"),
            work_items_batch_size: std::env::var("BOARDS_WORK_ITEMS_BATCH_SIZE")
                .ok()
                .and_then(|s| s.trim().parse().ok().map(|v| ParsedProperty::Env(v, s))),
        }
    }

    /// `$XDG_CONFIG_HOME/boards/config.toml`, falling back to `~/.config`.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = match std::env::var("XDG_CONFIG_HOME") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .map(|home| home.join(".config"))
                .ok_or_else(|| ConfigError::FileReadError {
                    path: PathBuf::from("~/.config"),
                    message: "could not determine home directory".to_string(),
                })?,
        };
        Ok(config_dir.join("boards").join("config.toml"))
    }

    /// Merges two settings, preferring values from `other` when present.
    pub fn merge(self, other: Self) -> Self {
        Self {
            instance: other.instance.or(self.instance),
            base_url: other.base_url.or(self.base_url),
            pat: other.pat.or(self.pat),
            work_items_api_version: other.work_items_api_version.or(self.work_items_api_version),
            pull_requests_api_version: other
                .pull_requests_api_version
                .or(self.pull_requests_api_version),
            work_items_batch_size: other.work_items_batch_size.or(self.work_items_batch_size),
        }
    }

    /// Validates the settings into something a client can be built from.
    pub fn resolve(self) -> Result<ConnectionSettings, ConfigError> {
        let pat = self
            .pat
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                field: "pat".to_string(),
                env_var: "BOARDS_PAT".to_string(),
            })?;

        let target = match (self.base_url, self.instance) {
            (Some(base_url), _) => {
                let url = Url::parse(base_url.value()).map_err(|e| {
                    invalid(
                        "base_url",
                        format!("{} (from {})", e, base_url.describe_source()),
                    )
                })?;
                ServiceTarget::OnPrem { base_url: url }
            }
            (None, Some(instance)) => ServiceTarget::Online {
                instance: instance.into_value(),
            },
            (None, None) => {
                return Err(ConfigError::MissingRequired {
                    field: "instance".to_string(),
                    env_var: "BOARDS_INSTANCE".to_string(),
                });
            }
        };

        let defaults = ClientConfiguration::default();
        let configuration = ClientConfiguration::new(
            self.work_items_api_version
                .map(ParsedProperty::into_value)
                .unwrap_or(defaults.work_items_api_version),
            self.pull_requests_api_version
                .map(ParsedProperty::into_value)
                .unwrap_or(defaults.pull_requests_api_version),
            self.work_items_batch_size
                .map(ParsedProperty::into_value)
                .unwrap_or(defaults.work_items_batch_size),
        )?;

        Ok(ConnectionSettings {
            target,
            pat: SecretString::from(pat.into_value()),
            configuration,
        })
    }
}
