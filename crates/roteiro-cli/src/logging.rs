//! File logging.
//!
//! Stdout carries command output, so logs go to a daily file under
//! `$ROTEIRO_HOME/logs`. The filter comes from `ROTEIRO_LOG` (default `warn`).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "ROTEIRO_LOG";

/// Installs the global subscriber.
///
/// Returns `None` when logging could not be set up; commands still run.
/// Keep the guard alive until exit so buffered lines are flushed.
pub fn init(logs_dir: &Path) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    std::fs::create_dir_all(logs_dir).ok()?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("roteiro")
        .filename_suffix("log")
        .build(logs_dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .ok()?;

    Some(guard)
}
