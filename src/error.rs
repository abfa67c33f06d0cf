//! Error types for the analysis pipeline.
//!
//! None of these errors abort an analysis run. Each one degrades to absent
//! data at the point where it occurs and is recorded in the diagnostic log.

use std::path::PathBuf;
use thiserror::Error;

/// Why a tool probe reported the tool as absent.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new failure
/// kinds in future versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProbeFailure {
    /// The probe program is not on `PATH` or in any fallback directory.
    #[error("executable not found")]
    NotFound,

    /// The probe did not finish within the configured timeout.
    #[error("probe timed out")]
    Timeout,

    /// The probe program could not be executed due to permissions.
    #[error("permission denied")]
    PermissionDenied,

    /// The probe ran but exited unsuccessfully.
    #[error("probe exited unsuccessfully")]
    NonZeroExit,

    /// Any other I/O failure while spawning the probe.
    #[error("I/O error while probing")]
    Io,
}

/// Non-fatal failures raised inside the pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    /// A history or configuration source is missing or unreadable.
    #[error("source unavailable: {}", path.display())]
    SourceUnavailable {
        /// The expanded path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An external tool check failed; the tool is treated as absent.
    #[error("probe for {tool} failed: {reason}")]
    ProbeFailed {
        /// Catalog name of the tool.
        tool: String,
        /// What went wrong.
        reason: ProbeFailure,
    },

    /// A configuration line did not have the expected `NAME=VALUE` shape.
    #[error("line {line_number} skipped: {line}")]
    ParseSkipped {
        /// One-based line number within the file.
        line_number: usize,
        /// The offending line, trimmed.
        line: String,
    },
}

impl AnalysisError {
    /// Short machine-friendly kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "source_unavailable",
            Self::ProbeFailed { .. } => "probe_failed",
            Self::ParseSkipped { .. } => "parse_skipped",
        }
    }
}
