// ABOUTME: JSONL file logging under the platform data directory
// The terminal belongs to the UI, so nothing is ever logged to stdout or stderr

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str = "teabag=info";

/// `<data_local_dir>/teabag/logs`, falling back to a relative path
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("teabag").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".teabag/logs"))
}

pub fn log_file_name(now: chrono::DateTime<chrono::Local>) -> String {
    format!("teabag-{}.jsonl", now.format("%Y%m%d-%H%M%S"))
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn setup_logging() -> Result<PathBuf> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let log_file = log_dir.join(log_file_name(chrono::Local::now()));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(log_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_file_name_is_timestamped() {
        let now = chrono::Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(log_file_name(now), "teabag-20240309-140507.jsonl");
    }

    #[test]
    fn test_log_dir_ends_with_app_name() {
        assert!(log_dir().ends_with("teabag/logs"));
    }
}
