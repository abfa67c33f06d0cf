//! Analysis options configuration.
//!
//! This module provides the [`AnalyzeOptions`] struct for configuring an
//! analysis run: probe timeouts and fan-out, how history lines are turned
//! into commands, and the thresholds used when building insights.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// How a cleaned history line becomes a command string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandExtraction {
    /// Keep only the last whitespace-separated field.
    ///
    /// Robust against unknown metadata prefixes, but drops arguments:
    /// `git commit -m x` becomes `x`.
    #[default]
    LastToken,

    /// Keep the whole line with whitespace runs collapsed.
    FullLine,
}

/// Configuration options for an analysis run.
///
/// # Example
///
/// ```rust
/// use shell_profiler::{AnalyzeOptions, CommandExtraction};
/// use std::time::Duration;
///
/// let opts = AnalyzeOptions {
///     probe_timeout: Duration::from_millis(500),
///     extraction: CommandExtraction::FullLine,
///     ..Default::default()
/// };
/// assert_eq!(opts.tracked_tools, 10);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Timeout for each tool probe subprocess.
    ///
    /// Default: 2 seconds
    pub probe_timeout: Duration,

    /// Maximum number of probe subprocesses in flight at once.
    ///
    /// Default: 8
    pub probe_concurrency: usize,

    /// Command extraction policy for history lines.
    ///
    /// Default: [`CommandExtraction::LastToken`]
    pub extraction: CommandExtraction,

    /// How many of the most-used tools feed proficiency, tech stack and
    /// secondary skills.
    ///
    /// Default: 10
    pub tracked_tools: usize,

    /// A two-token prefix must be seen more often than this to be reported
    /// as a common workflow.
    ///
    /// Default: 10
    pub workflow_threshold: usize,

    /// Home directory that `~/` paths resolve against.
    ///
    /// `None` uses the current user's home directory.
    pub home_dir: Option<PathBuf>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(2),
            probe_concurrency: 8,
            extraction: CommandExtraction::LastToken,
            tracked_tools: 10,
            workflow_threshold: 10,
            home_dir: None,
        }
    }
}

impl AnalyzeOptions {
    /// The home directory paths are resolved against.
    ///
    /// Falls back to `.` when no home directory can be determined.
    pub fn resolve_home(&self) -> PathBuf {
        self.home_dir
            .clone()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
