//! Structured logging for the reachability monitor
//!
//! File-based logging with daily rotation plus a compact console layer.
//! Logs are written under the per-platform app data directory.

pub mod macros;

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::APP_DIR_NAME;

/// Initialize the logging system
///
/// Creates the log directory and sets up daily rotating log files next to
/// a compact stderr layer. Set `RUST_LOG` to control the level (default:
/// `info`).
pub fn init_logging() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "netreach.log");

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .json();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let init_result = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = init_result {
        // Avoid panicking when another subsystem/test already installed a
        // global subscriber.
        if e.to_string().contains("already been set") {
            return Ok(log_dir);
        }
        return Err(Box::new(e));
    }

    tracing::debug!("Logging initialized. Log directory: {}", log_dir.display());

    Ok(log_dir)
}

/// Get log directory path
///
/// Returns: `%LOCALAPPDATA%/netreach/logs` on Windows,
///          `~/.config/netreach/logs` on Linux/macOS
fn get_log_directory() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .ok_or("Could not find APPDATA directory")?
            .join(APP_DIR_NAME)
    } else {
        dirs::config_dir()
            .ok_or("Could not find config directory")?
            .join(APP_DIR_NAME)
    };

    Ok(base_dir.join("logs"))
}
