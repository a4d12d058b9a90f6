//! Logging setup for the `boards` CLI.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary. Logging is off unless a level is given, through
//! `--log-level` or `BOARDS_LOG_LEVEL`. Output goes to stderr, or appends to
//! `--log-file` / `BOARDS_LOG_FILE`, as text or JSON (`--log-format` /
//! `BOARDS_LOG_FORMAT`).

use std::io::Write;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Crates whose events are shown; dependencies stay quiet.
const LOGGED_TARGETS: [&str; 2] = ["boards_client", "boards"];

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// `None` disables logging.
    pub level: Option<LogLevel>,
    /// `None` logs to stderr.
    pub file: Option<PathBuf>,
    pub format: LogFormat,
}

impl LogConfig {
    /// Combines command line values with `BOARDS_LOG_*` variables, the command
    /// line winning. Unparsable levels and formats are ignored.
    #[must_use]
    pub fn from_sources(
        cli_level: Option<&str>,
        cli_file: Option<PathBuf>,
        cli_format: Option<&str>,
    ) -> Self {
        let env_level = std::env::var("BOARDS_LOG_LEVEL").ok();
        let env_file = std::env::var("BOARDS_LOG_FILE").ok();
        let env_format = std::env::var("BOARDS_LOG_FORMAT").ok();

        Self {
            level: cli_level
                .map(str::to_string)
                .or(env_level)
                .and_then(|s| LogLevel::parse(&s)),
            file: cli_file.or(env_file.filter(|f| !f.is_empty()).map(PathBuf::from)),
            format: cli_format
                .map(str::to_string)
                .or(env_format)
                .and_then(|s| LogFormat::parse(&s))
                .unwrap_or_default(),
        }
    }

    /// Filter directive limiting output to this crate and its binary.
    #[must_use]
    pub fn filter_directive(&self) -> Option<String> {
        let level = self.level?;
        Some(
            LOGGED_TARGETS
                .iter()
                .map(|target| format!("{}={}", target, level.as_filter_str()))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// Keeps the background writer alive; logs are flushed when it drops.
pub struct LogGuard {
    _writer_guard: WorkerGuard,
}

/// Installs the global subscriber.
///
/// Returns `None` when logging is disabled or the log file cannot be opened.
/// Hold the guard until the process exits.
///
/// # Example
///
/// ```rust,no_run
/// use boards_client::logging::{LogConfig, LogFormat, LogLevel, init_logging};
///
/// let config = LogConfig {
///     level: Some(LogLevel::Debug),
///     file: None,
///     format: LogFormat::Json,
/// };
/// let _guard = init_logging(config);
/// ```
#[must_use = "the returned guard must be held until application exit"]
pub fn init_logging(config: LogConfig) -> Option<LogGuard> {
    let filter = EnvFilter::new(config.filter_directive()?);

    let writer: Box<dyn Write + Send> = match &config.file {
        Some(path) => Box::new(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()?,
        ),
        None => Box::new(std::io::stderr()),
    };
    let to_file = config.file.is_some();
    let (non_blocking, guard) = tracing_appender::non_blocking(writer);

    match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_file(to_file)
                .with_line_number(to_file);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogFormat::Text => {
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(!to_file)
                .with_target(true)
                .with_level(true)
                .compact();
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }

    Some(LogGuard {
        _writer_guard: guard,
    })
}
