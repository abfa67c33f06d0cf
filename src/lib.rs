//! # shell-profiler
//!
//! Shell history and configuration analysis.
//!
//! This crate reads the command history and configuration files of the
//! supported shells (bash, zsh, fish), probes the host for installed
//! developer tools, and derives a profile of the user: categorized command
//! usage, primary role, tech stack, per-tool proficiency, peak working hours,
//! productivity scores, aliases, environment variables and plugins.
//!
//! ## Features
//!
//! - `Shell` enum identifying supported shell families
//! - `probe_all()` async environment probe over the static tool catalog
//! - `read_history()` / `clean_line()` history reading and cleaning
//! - `classify()` rule-based command categorization
//! - `parse_config()` alias and environment extraction
//! - `InsightAccumulator` folding commands into [`Insights`]
//! - `analyze()` / `spawn_analysis()` running the full pipeline
//!
//! ## Example
//!
//! ```rust,no_run
//! use shell_profiler::{spawn_analysis, AnalyzeOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let rx = spawn_analysis(AnalyzeOptions::default());
//!     let snapshot = rx.await.expect("analysis task finished");
//!
//!     let profile = &snapshot.insights.technical_profile;
//!     println!("role: {:?}", profile.primary_role);
//!     println!("peak hours: {:?}", snapshot.insights.work_patterns.peak_hours);
//! }
//! ```

mod analyze;
mod classify;
mod config;
mod error;
mod history;
mod insights;
pub mod logging;
mod model;
mod options;
mod plugins;
mod probe;
mod shell;

pub use analyze::{analyze, analyze_with_inventory, spawn_analysis};
pub use classify::{classify, detect_tools, Category, Classification, Tag, WorkflowPattern};
pub use config::{load_shell_config, parse_config, ConfigScan};
pub use error::{AnalysisError, ProbeFailure};
pub use history::{clean_line, read_history};
pub use insights::{
    peak_hours, InsightAccumulator, COMMAND_COMPLEXITY, COMMAND_VARIETY, WORKFLOW_COMPLEXITY,
};
pub use model::{
    AnalysisSnapshot, CommandRecord, ConfigFileInfo, Insights, PluginInfo, ShellConfig,
    TechnicalProfile, TimeSource, ToolUsage, WorkPatterns,
};
pub use options::{AnalyzeOptions, CommandExtraction};
pub use plugins::detect_plugins;
pub use probe::{lookup, probe_all, probe_tool, ToolInventory, ToolKind, ToolPresence, ToolSpec, CATALOG};
pub use shell::{expand_path, Shell};
