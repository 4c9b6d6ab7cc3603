//! Logging infrastructure.
//!
//! Provides structured logging with file output and console output:
//! - Writes to `~/.hatchery/logs/hatchery.log` (cleared on session start)
//! - Also prints to stderr, keeping stdout clean for command output
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Log filename inside the log directory.
pub const LOG_FILE: &str = "hatchery.log";

/// Initialize logging.
///
/// Creates the log directory if needed, clears the previous log file, and
/// sets up dual output to file and stderr. The default filter is `warn` for
/// quiet runs and `debug` with `verbose`; `RUST_LOG` overrides both.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the log file
/// cannot be cleared.
pub fn init_logging(log_dir: &Path, verbose: bool) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;

    // Clear previous log file; handles both existing and missing files.
    let log_path = log_dir.join(LOG_FILE);
    fs::write(&log_path, "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time();

    let default_filter = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Default log directory (~/.hatchery/logs).
pub fn default_log_dir() -> std::path::PathBuf {
    crate::config::config_directory().join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_directory_and_clears_file() {
        let temp = TempDir::new().unwrap();
        let log_dir = temp.path().join("logs");
        fs::create_dir_all(&log_dir).unwrap();
        fs::write(log_dir.join(LOG_FILE), "old content").unwrap();

        // init_logging sets the global subscriber, which can only happen
        // once per process; exercise the filesystem half directly.
        let log_path = log_dir.join(LOG_FILE);
        fs::write(&log_path, "").unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_default_log_dir() {
        assert!(default_log_dir().ends_with(".hatchery/logs"));
    }
}
