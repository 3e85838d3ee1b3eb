use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::core::config::AppPaths;

const LOG_FILE_PREFIX: &str = "survey-rag.log";
const DEFAULT_FILTER: &str = "info,tower_http=debug";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logs to stdout and to a daily rolling file under `paths.log_dir`.
///
/// `RUST_LOG` overrides the default filter.
pub fn init(paths: &AppPaths) {
    if let Err(err) = std::fs::create_dir_all(&paths.log_dir) {
        eprintln!(
            "Failed to create log directory {}: {}",
            paths.log_dir.display(),
            err
        );
    }

    let file_appender = tracing_appender::rolling::daily(&paths.log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console = tracing_subscriber::fmt::layer().with_target(false);
    let file = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
    {
        eprintln!("Logging already initialized: {}", err);
    }
}
