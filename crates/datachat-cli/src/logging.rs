//! File logging.
//!
//! The TUI owns the terminal, so logs go to ${DATACHAT_HOME}/datachat.log.
//! `DATACHAT_LOG` takes an `EnvFilter` directive (default `warn`).

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "DATACHAT_LOG";

/// Installs the global subscriber.
///
/// Returns the writer guard, which must live until exit so buffered lines are
/// flushed. Returns `None` when the log directory can't be created; the
/// program runs without logs in that case.
pub fn init() -> Option<WorkerGuard> {
    let path = datachat_core::config::paths::log_path();
    let dir = path.parent()?;
    let file_name = path.file_name()?;
    std::fs::create_dir_all(dir).ok()?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
