//! Structured logging setup using tracing
//!
//! Console output goes to stderr so command output on stdout stays clean.
//! With `[logging] local_enabled = true`, a JSON layer additionally writes to
//! a rolling file under `local_path`.

use crate::config::LoggingConfig;
use crate::domain::{Result, StockroomError};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// File name prefix for rolling log files
const LOG_FILE_PREFIX: &str = "stockroom.log";

/// Guard that must be kept alive for the duration of the program
/// to ensure logs are flushed properly
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self {
            _file_guard: file_guard,
        }
    }
}

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `log_level_str` when set.
///
/// # Errors
///
/// Returns [`StockroomError::Configuration`] for an unknown level, a log
/// directory that cannot be created, or a subscriber that is already set.
///
/// # Example
///
/// ```no_run
/// use stockroom::logging::init_logging;
/// use stockroom::config::LoggingConfig;
///
/// # fn example() -> stockroom::domain::Result<()> {
/// let _guard = init_logging("info", &LoggingConfig::default())?;
/// tracing::info!("Application started");
/// # Ok(())
/// # }
/// ```
pub fn init_logging(log_level_str: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_level = parse_log_level(log_level_str)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stockroom={log_level}")));

    let mut layers = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter.clone());
    layers.push(console_layer.boxed());

    let file_guard = if config.local_enabled {
        std::fs::create_dir_all(&config.local_path).map_err(|e| {
            StockroomError::Configuration(format!(
                "Failed to create log directory {}: {e}",
                config.local_path
            ))
        })?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(config)?);

        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(non_blocking)
            .with_filter(env_filter);

        layers.push(file_layer.boxed());
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| StockroomError::Configuration(format!("Failed to initialize logging: {e}")))?;

    tracing::debug!(
        level = %log_level,
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        "Logging initialized"
    );

    Ok(LoggingGuard::new(file_guard))
}

/// Rolling appender that keeps at most `local_max_files` rotated files
fn file_appender(config: &LoggingConfig) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(rotation_for(&config.local_rotation))
        .filename_prefix(LOG_FILE_PREFIX)
        .max_log_files(config.local_max_files)
        .build(&config.local_path)
        .map_err(|e| {
            StockroomError::Configuration(format!(
                "Failed to open log file in {}: {e}",
                config.local_path
            ))
        })
}

fn rotation_for(setting: &str) -> Rotation {
    match setting {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

/// Parse log level from string
fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(StockroomError::Configuration(format!(
            "Invalid log level: {level_str}. Must be one of: trace, debug, info, warn, error"
        ))),
    }
}
