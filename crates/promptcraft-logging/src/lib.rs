//! # promptcraft-logging
//!
//! Logging for the promptcraft wizard.
//!
//! ## Key Types
//!
//! - [`Logger`] - Structured wizard event logging
//! - [`LogEvent`] - Log event types
//! - [`LogFormat`] - Output formats (Pretty, JSON, Compact)
//!
//! Line-oriented commands log to stderr through [`init_tracing`]. The TUI owns
//! the terminal, so it routes tracing output to a rolling file with
//! [`init_file_tracing`] instead.

mod events;

pub use events::{LogEvent, LogFormat, Logger};

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing for the application
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(false).with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty | LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Initialize tracing into a daily-rotated file under `dir`.
///
/// The returned guard flushes buffered lines on drop and must be held for the
/// lifetime of the program.
pub fn init_file_tracing(level: &str, dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::daily(dir, "promptcraft.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_target(false).with_writer(writer))
        .init();

    Ok(guard)
}

/// Default directory for log files (`~/.local/share/promptcraft/logs`).
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptcraft")
        .join("logs")
}
