//! Logging initialization for metachecker.
//!
//! Always logs to stderr; with `logging.to_file` a copy goes to
//! `{logging.dir}/metachecker-{datetime}.log`.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Guard that must be kept alive for the duration of the program.
    /// When dropped, ensures all buffered logs are flushed.
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set with file logging enabled)
    pub log_file_path: Option<PathBuf>,
}

/// Effective filter directive: `--debug` beats config; `RUST_LOG` beats both
fn filter_directive(config: &Config, debug_override: bool) -> String {
    let level = if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    std::env::var("RUST_LOG").unwrap_or(level)
}

/// Log filename for a given start time
pub fn log_filename(timestamp: chrono::DateTime<chrono::Utc>) -> String {
    format!("metachecker-{}.log", timestamp.format("%Y%m%dT%H%M%SZ"))
}

/// Initialize logging.
///
/// # Arguments
/// * `config` - Application configuration
/// * `debug_override` - If true, override log level to "debug" (from --debug flag)
///
/// # Returns
/// A `LoggingHandle` that must be kept alive for the duration of the program.
pub fn init_logging(config: &Config, debug_override: bool) -> Result<LoggingHandle> {
    let filter = tracing_subscriber::EnvFilter::new(filter_directive(config, debug_override));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.logging.to_file {
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir).context("Failed to create logs directory")?;

        let log_filename = log_filename(chrono::Utc::now());
        let log_file_path = logs_dir.join(&log_filename);

        let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_log_filename_format() {
        let ts = chrono::Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(log_filename(ts), "metachecker-20260304T050607Z.log");
    }

    #[test]
    fn test_logs_path_under_configured_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.logging.dir = temp_dir.path().to_string_lossy().to_string();

        assert_eq!(config.logs_path(), temp_dir.path());
    }

    #[test]
    fn test_debug_override_directive() {
        // We can't call init_logging more than once per process, so the
        // filter selection is tested on its own
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = Config::default();
        assert_eq!(filter_directive(&config, true), "debug");
        assert_eq!(filter_directive(&config, false), "info");
    }
}
