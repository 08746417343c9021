//! Tracing setup for the framewatch binary and tests.

use std::fs::OpenOptions;
use std::sync::Mutex;

use crate::config::LoggingConfig;

/// Install the global tracing subscriber from the logging configuration.
///
/// `RUST_LOG` overrides the configured level filter. When a log file is
/// configured it is appended to with ANSI colors disabled; a file that
/// cannot be opened falls back to terminal output.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file = config.file.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| eprintln!("Failed to open log file {}: {e}", path.display()))
            .ok()
    });

    match (file, config.json) {
        (Some(file), true) => install(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .json()
                .finish(),
        ),
        (Some(file), false) => install(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .finish(),
        ),
        (None, true) => install(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .json()
                .finish(),
        ),
        (None, false) => install(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_target(true)
                .finish(),
        ),
    }
}

fn install<S>(subscriber: S)
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    // Tests may install a subscriber more than once; later calls are no-ops.
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}
