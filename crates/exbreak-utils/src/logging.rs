//! # Logging Utilities
//!
//! Logging infrastructure for exbreak using `tracing`.
//!
//! The core crate only emits `tracing` events; whoever hosts it installs a
//! subscriber once at startup with one of the functions here.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use exbreak_utils::init_logging;
//!
//! // Keep the guard alive for as long as the process logs.
//! let _guard = init_logging().expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=exbreak_core=debug`)
//! - `EXBREAK_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
//! - `EXBREAK_LOG_FILE`: Optional log file, written in addition to stderr
//!
//! ## Hosts that own the console
//!
//! An editor or IDE host usually routes diagnostics into its own output
//! pane. [`init_logging_to_file`] writes only to a file so nothing reaches
//! stdout/stderr.

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    #[default]
    Pretty,
    /// JSON lines, one event per line
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "text" => Ok(LogFormat::Pretty),
            "json" | "prod" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(format!("{s}. Use 'pretty' or 'json'"))),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(format!(
                "{s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            ))),
        }
    }
}

/// Keeps background log writers flushing. Drop it at shutdown.
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard
{
    _file: Option<WorkerGuard>,
}

/// Initialize logging from the environment
///
/// Reads `RUST_LOG`, `EXBREAK_LOG_FORMAT` and `EXBREAK_LOG_FILE`. An
/// unparseable `EXBREAK_LOG_FORMAT` falls back to pretty output.
///
/// ## Errors
///
/// Returns an error if logging is already initialized or the log file
/// directory cannot be created.
pub fn init_logging() -> Result<LoggingGuard, LoggingError>
{
    let format = std::env::var("EXBREAK_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse::<LogFormat>().ok())
        .unwrap_or_default();
    let log_file = std::env::var("EXBREAK_LOG_FILE").ok().map(PathBuf::from);

    install(env_filter(None), format, true, log_file.as_deref())
}

/// Initialize logging with explicit level and format
///
/// `RUST_LOG` is ignored; `EXBREAK_LOG_FILE` is still honoured.
///
/// ## Errors
///
/// Returns an error if logging is already initialized or file logging fails.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<LoggingGuard, LoggingError>
{
    let log_file = std::env::var("EXBREAK_LOG_FILE").ok().map(PathBuf::from);
    install(env_filter(Some(level)), format, true, log_file.as_deref())
}

/// Initialize file-only logging
///
/// Nothing is written to stdout/stderr. With `level == None`, `RUST_LOG` or
/// `INFO` is used.
///
/// ## Errors
///
/// Returns an error if logging is already initialized or the directory of
/// `path` cannot be created.
pub fn init_logging_to_file(path: &Path, level: Option<LogLevel>) -> Result<LoggingGuard, LoggingError>
{
    install(env_filter(level), LogFormat::Pretty, false, Some(path))
}

/// Dated log file in the user's home directory.
///
/// `~/.exbreak/YYYY-MM-DD-exbreak.log`, or the system temp directory when
/// `HOME` is not set.
#[must_use]
pub fn default_log_path() -> PathBuf
{
    let today = Utc::now().format("%Y-%m-%d");
    let directory = std::env::var_os("HOME").map_or_else(std::env::temp_dir, |home| PathBuf::from(home).join(".exbreak"));
    directory.join(format!("{today}-exbreak.log"))
}

/// Build the level filter.
///
/// Priority: explicit level, then `RUST_LOG`, then `INFO`.
fn env_filter(level: Option<LogLevel>) -> EnvFilter
{
    match level {
        Some(level) => EnvFilter::new(Level::from(level).to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string())),
    }
}

fn layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339());

    match format {
        LogFormat::Pretty => base.with_ansi(ansi).boxed(),
        LogFormat::Json => base.json().with_current_span(true).with_span_list(true).boxed(),
    }
}

fn install(filter: EnvFilter, format: LogFormat, console: bool, log_file: Option<&Path>) -> Result<LoggingGuard, LoggingError>
{
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut guard = LoggingGuard::default();

    if console {
        layers.push(layer(format, io::stderr, true));
    }

    if let Some(path) = log_file {
        let directory = path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
        std::fs::create_dir_all(directory)?;
        let file_name = path.file_name().ok_or_else(|| {
            LoggingError::InitializationFailed(format!("log file path has no file name: {}", path.display()))
        })?;
        let appender = tracing_appender::rolling::never(directory, file_name);
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        layers.push(layer(format, writer, false));
        guard._file = Some(file_guard);
    }

    Registry::default()
        .with(layers.with_filter(filter))
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))?;

    Ok(guard)
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}
