//! Data model handed from the pipeline to its consumer.

use crate::classify::{Category, WorkflowPattern};
use crate::{Shell, ToolInventory};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Where a command's time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSource {
    /// Read from history metadata (zsh extended history, bash `#epoch`,
    /// fish `when:`).
    Recorded,
    /// Placeholder: the moment the history was read.
    Captured,
}

/// One cleaned history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRecord {
    /// Cleaned command text.
    pub text: String,
    /// Approximate time the command was issued.
    pub time: Option<DateTime<Local>>,
    /// Whether `time` is real or a placeholder.
    pub time_source: TimeSource,
    /// Categories whose prefix rules matched.
    pub categories: BTreeSet<Category>,
    /// Workflow patterns whose regexes matched.
    pub workflows: BTreeSet<WorkflowPattern>,
}

/// A configuration file that was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigFileInfo {
    /// Expanded path.
    pub path: PathBuf,
    /// Last modification time, when the filesystem reports one.
    pub modified: Option<DateTime<Local>>,
    /// Raw file content, lossily decoded.
    pub content: String,
}

/// A detected plugin or plugin manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    /// Directory name or drop-in file stem.
    pub name: String,
    /// Directory or file the plugin was detected at.
    pub source: PathBuf,
    /// Modification time of `source`.
    pub last_updated: Option<DateTime<Local>>,
}

/// Configuration discovered for one shell family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShellConfig {
    /// Keyed by the unexpanded (`~/`-relative) path.
    pub config_files: BTreeMap<String, ConfigFileInfo>,
    /// Alias name to expansion; later files win.
    pub aliases: BTreeMap<String, String>,
    /// Exported variable name to value; later files win.
    pub environment: BTreeMap<String, String>,
    /// Plugin managers first, then drop-in files.
    pub plugins: Vec<PluginInfo>,
}

/// Skills and role inferred from tool usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TechnicalProfile {
    /// `"<Tool> Developer"` for the most-used tool; `None` without usage.
    pub primary_role: Option<String>,
    /// Installed languages with at least one use.
    pub tech_stack: BTreeSet<String>,
    /// Installed non-language tools with at least one use.
    pub secondary_skills: BTreeSet<String>,
    /// Share of all commands attributable to each tool, in `[0, 1]`.
    pub proficiency: BTreeMap<String, f64>,
}

/// Temporal and productivity patterns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkPatterns {
    /// Up to three busiest hours of the day, busiest first.
    pub peak_hours: Vec<u32>,
    /// Named scores in `[0, 1]`.
    pub productivity: BTreeMap<String, f64>,
    /// Advice derived from frequent two-token command prefixes.
    pub common_workflows: Vec<String>,
}

/// Usage counts split by tool kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolUsage {
    /// Commands attributed to each used editor.
    pub editors: BTreeMap<String, usize>,
    /// Commands attributed to each used language.
    pub languages: BTreeMap<String, usize>,
    /// Commands attributed to each used build tool.
    pub build_tools: BTreeMap<String, usize>,
}

/// Everything the aggregator derives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Insights {
    /// Role, stack and per-tool proficiency.
    pub technical_profile: TechnicalProfile,
    /// Peak hours, productivity scores and frequent prefixes.
    pub work_patterns: WorkPatterns,
    /// Usage counts by tool kind.
    pub tool_usage: ToolUsage,
    /// Configuration advice per shell.
    pub recommendations: Vec<String>,
}

/// Result of one full analysis run.
///
/// Built once by the pipeline and handed to the consumer by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSnapshot {
    /// Only shells whose history could be read appear here.
    pub histories: BTreeMap<Shell, Vec<CommandRecord>>,
    /// Every supported shell, whether or not its history was found.
    pub shell_configs: BTreeMap<Shell, ShellConfig>,
    /// Aggregated over all histories.
    pub insights: Insights,
    /// Environment probe results.
    pub tools: ToolInventory,
    /// When the run started assembling the snapshot.
    pub captured_at: DateTime<Local>,
}

impl AnalysisSnapshot {
    /// Total number of commands across all shells.
    pub fn total_commands(&self) -> usize {
        self.histories.values().map(Vec::len).sum()
    }
}
