//! Diagnostic log configuration and initialization.
//!
//! The analysis never surfaces errors to its consumer; they are recorded
//! here instead. Output goes to an append-mode file so it does not interfere
//! with whatever the consumer draws on the terminal.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How events are written to the log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// One human-readable line per event, with file and line.
    #[default]
    Text,
    /// One JSON object per event, for machine consumption.
    Json,
}

/// Logging configuration built from CLI arguments.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// File the log is appended to.
    pub path: PathBuf,
    /// Include debug events (probe failures, skipped config lines).
    pub debug: bool,
    /// Line format of the log file.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("shell_analyzer.log"),
            debug: false,
            format: LogFormat::Text,
        }
    }
}

impl LogConfig {
    /// Build an EnvFilter from this configuration.
    ///
    /// `RUST_LOG` takes precedence when set.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }
        EnvFilter::new(self.directives())
    }

    fn directives(&self) -> &'static str {
        if self.debug {
            "shell_profiler=debug,warn"
        } else {
            "shell_profiler=info,warn"
        }
    }
}

/// Install the global subscriber writing to `config.path`.
///
/// # Errors
///
/// Fails when the log file cannot be opened or a global subscriber is
/// already installed. The caller should treat this as fatal.
pub fn init(config: &LogConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.path)
        .with_context(|| format!("failed to open log file {}", config.path.display()))?;
    let writer = Mutex::new(file);
    let filter = config.build_filter();

    let installed = match config.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(writer).with_target(true))
            .try_init(),
    };
    installed.context("failed to install log subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_values() {
        use clap::ValueEnum;

        assert_eq!(LogFormat::from_str("text", true), Ok(LogFormat::Text));
        assert_eq!(LogFormat::from_str("JSON", true), Ok(LogFormat::Json));
        assert!(LogFormat::from_str("yaml", true).is_err());
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.path, PathBuf::from("shell_analyzer.log"));
        assert!(!config.debug);
        assert_eq!(config.format, LogFormat::Text);
    }

    #[test]
    fn test_directives_follow_debug_flag() {
        let mut config = LogConfig::default();
        assert_eq!(config.directives(), "shell_profiler=info,warn");
        config.debug = true;
        assert_eq!(config.directives(), "shell_profiler=debug,warn");
    }

    #[test]
    fn test_init_fails_for_unwritable_path() {
        let config = LogConfig {
            path: PathBuf::from("/nonexistent-dir/sub/shell_analyzer.log"),
            ..Default::default()
        };
        let error = init(&config).unwrap_err();
        assert!(error.to_string().contains("failed to open log file"));
    }
}
