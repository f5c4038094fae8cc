use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MAX_LOG_SIZE: u64 = 1024 * 1024; // 1MB

/// Initialize logging for a component.
///
/// - `component_name`: name of the component (e.g., "cli")
/// - `log_dir`: if given, also log to `<log_dir>/<component>.log`
///
/// Returns a guard that must be kept alive for the duration of the program
/// when file logging is enabled. Library code never calls this; only
/// binaries and the embedder do.
pub fn init_logging(component_name: &str, log_dir: Option<&Path>) -> io::Result<Option<WorkerGuard>> {
    let env_filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(log_dir) = log_dir {
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", component_name));
        truncate_if_needed(&log_path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let (non_blocking_file, guard) = tracing_appender::non_blocking(BufWriter::new(file));

        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer().with_writer(io::stdout).with_ansi(true))
            .with(
                fmt::layer()
                    .with_writer(non_blocking_file)
                    .with_ansi(false)
                    .with_target(true),
            )
            .init();

        tracing::info!("Logging to file: {}", log_path.display());

        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter()).init();

        Ok(None)
    }
}

/// Truncate the log file if it exceeds MAX_LOG_SIZE.
fn truncate_if_needed(log_path: &Path) -> io::Result<()> {
    if log_path.exists() {
        let metadata = fs::metadata(log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            let file = File::create(log_path)?;
            file.set_len(0)?;
        }
    }
    Ok(())
}
