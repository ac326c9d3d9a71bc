//! Logging bootstrap: daily-rotated file log with env-controlled filtering.
//!
//! Falls back to stderr when the log directory cannot be resolved or created,
//! so a broken HOME never prevents the hook from handling its event.

use std::env;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "pulse-hook.log";

pub fn init() -> Option<WorkerGuard> {
    let filter = if debug_enabled() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    match file_writer() {
        Some((writer, guard)) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

fn file_writer() -> Option<(NonBlocking, WorkerGuard)> {
    let log_dir = pulse_core::config::log_dir().ok()?;
    fs_err::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    Some(tracing_appender::non_blocking(appender))
}

fn debug_enabled() -> bool {
    env::var("PULSE_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}
