// Subscriber setup: stdout plus an append-only service log file
use std::path::Path;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

pub const DEFAULT_LOG_FILE: &str = "service_log.txt";

/// Directory and file name for the log, `.` when the path has no parent.
fn split_log_path(log_file: &Path) -> (&Path, String) {
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = log_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    (dir, name)
}

fn file_appender(log_file: &Path) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    let (dir, name) = split_log_path(log_file);
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
}

/// Logs to stdout and appends to `log_file` when it can be opened.
/// `RUST_LOG` overrides the default `info` level. The returned guard flushes
/// the file writer on drop and must be held for the life of the process.
pub fn init_logging(log_file: &Path) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard, failure) = match file_appender(log_file) {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    if let Some(e) = failure {
        warn!("File logging disabled ({}): {}", log_file.display(), e);
    }
    guard
}
