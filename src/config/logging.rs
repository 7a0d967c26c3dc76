use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("File system error: {0}")]
    FileSystemError(#[from] std::io::Error),
}

/// Initialize the tracing subscriber.
///
/// Reads `LOG_LEVEL` (an `EnvFilter` directive, default `INFO`) and
/// optionally `APP_LOG_FILE` for a daily-rotated log file alongside the
/// console output.
pub fn init_logging() -> Result<(), LoggingError> {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let log_file = env::var("APP_LOG_FILE").ok().map(PathBuf::from);

    let env_filter = EnvFilter::try_new(&log_level)
        .map_err(|e| LoggingError::InvalidLogLevel(format!("{}: {}", log_level, e)))?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter.clone());

    let registry = tracing_subscriber::registry().with(console_layer);

    match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)?;

            let file_name = path
                .file_name()
                .ok_or_else(|| LoggingError::InitializationError("Invalid log file path".to_string()))?;
            let file_appender = tracing_appender::rolling::daily(dir, file_name);

            let file_layer = fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(env_filter);

            registry
                .with(file_layer)
                .try_init()
                .map_err(|e| LoggingError::InitializationError(e.to_string()))
        }
        None => registry
            .try_init()
            .map_err(|e| LoggingError::InitializationError(e.to_string())),
    }
}
