use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default log directory: `<data_local_dir>/finboard/logs`
pub fn default_log_dir() -> Result<PathBuf> {
    Ok(dirs::data_local_dir()
        .ok_or(anyhow::anyhow!("Could not find local data directory"))?
        .join("finboard")
        .join("logs"))
}

/// Initialize tracing with file-based logging.
///
/// Logs are written to `<log_dir>/finboard-YYYY-MM-DD-HH-MM-SS.log`. The returned
/// guard flushes the non-blocking writer on drop, so hold it until exit.
pub fn init_logging(log_dir: Option<&Path>) -> Result<(PathBuf, WorkerGuard)> {
    let logs_dir = match log_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_log_dir()?,
    };
    std::fs::create_dir_all(&logs_dir)?;

    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let log_filename = format!("finboard-{}.log", timestamp);
    let log_path = logs_dir.join(&log_filename);

    let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    // Default to INFO, overridable with RUST_LOG
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()?;

    Ok((log_path, guard))
}
