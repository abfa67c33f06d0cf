//! Insight aggregation.
//!
//! [`InsightAccumulator`] folds classified commands into counters; calling
//! [`InsightAccumulator::finish`] turns the counters into [`Insights`]. The
//! accumulator is the only mutable state of the aggregation and is consumed
//! when the insights are built.
//!
//! Every ratio is computed against the total command count and is skipped
//! entirely when that count is zero, so no score is ever `NaN`.

use crate::classify::detect_tools;
use crate::model::{CommandRecord, Insights, ShellConfig, TechnicalProfile, ToolUsage, WorkPatterns};
use crate::{AnalyzeOptions, Shell, ToolInventory, ToolKind, ToolSpec};
use chrono::Timelike;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Number of peak hours reported.
const PEAK_HOURS: usize = 3;

/// Fewer aliases than this triggers an alias recommendation.
const MIN_ALIASES: usize = 5;

/// Fewer plugins than this triggers a plugin recommendation.
const MIN_PLUGINS: usize = 3;

/// Productivity key: distinct commands over total commands.
pub const COMMAND_VARIETY: &str = "Command Variety";
/// Productivity key: workflow pattern matches over total commands.
pub const WORKFLOW_COMPLEXITY: &str = "Workflow Complexity";
/// Productivity key: pipe, redirection and argument weight over total
/// commands.
pub const COMMAND_COMPLEXITY: &str = "Command Complexity";

/// Running counters over a command stream.
#[derive(Debug)]
pub struct InsightAccumulator<'a> {
    inventory: &'a ToolInventory,
    total: usize,
    hours: [usize; 24],
    distinct: HashSet<String>,
    workflow_matches: usize,
    complexity: f64,
    /// Tool usage in order of first observation.
    tools: Vec<(&'static ToolSpec, usize)>,
    prefixes: HashMap<String, usize>,
}

impl<'a> InsightAccumulator<'a> {
    /// Start an empty accumulator; only tools installed in `inventory` are
    /// counted.
    pub fn new(inventory: &'a ToolInventory) -> Self {
        Self {
            inventory,
            total: 0,
            hours: [0; 24],
            distinct: HashSet::new(),
            workflow_matches: 0,
            complexity: 0.0,
            tools: Vec::new(),
            prefixes: HashMap::new(),
        }
    }

    /// Fold one command into the counters.
    pub fn observe(&mut self, record: &CommandRecord) {
        let text = record.text.as_str();
        self.total += 1;

        if let Some(time) = record.time {
            self.hours[time.hour() as usize] += 1;
        }
        if !self.distinct.contains(text) {
            self.distinct.insert(text.to_string());
        }
        self.workflow_matches += record.workflows.len();
        self.complexity += command_complexity(text);

        for spec in detect_tools(text, self.inventory) {
            match self.tools.iter_mut().find(|(seen, _)| seen.name == spec.name) {
                Some((_, count)) => *count += 1,
                None => self.tools.push((spec, 1)),
            }
        }

        let mut fields = text.split_whitespace();
        if let (Some(first), Some(second)) = (fields.next(), fields.next()) {
            *self.prefixes.entry(format!("{first} {second}")).or_default() += 1;
        }
    }

    /// Fold a whole history.
    pub fn observe_all<'r>(&mut self, records: impl IntoIterator<Item = &'r CommandRecord>) {
        for record in records {
            self.observe(record);
        }
    }

    /// Number of commands observed so far.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Build the insights.
    ///
    /// `configs` only feeds the recommendations.
    pub fn finish(
        self,
        configs: &BTreeMap<Shell, ShellConfig>,
        options: &AnalyzeOptions,
    ) -> Insights {
        let mut ranked = self.tools.clone();
        // stable: equal counts keep first-observation order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        Insights {
            technical_profile: self.technical_profile(&ranked, options.tracked_tools),
            work_patterns: WorkPatterns {
                peak_hours: peak_hours(&self.hours),
                productivity: self.productivity(),
                common_workflows: self.common_workflows(options.workflow_threshold),
            },
            tool_usage: self.tool_usage(),
            recommendations: recommendations(configs),
        }
    }

    fn technical_profile(
        &self,
        ranked: &[(&'static ToolSpec, usize)],
        tracked: usize,
    ) -> TechnicalProfile {
        let mut profile = TechnicalProfile {
            primary_role: ranked
                .first()
                .map(|(spec, _)| format!("{} Developer", title_case(spec.name))),
            ..Default::default()
        };

        for &(spec, count) in ranked.iter().take(tracked) {
            if spec.kind == ToolKind::Language {
                profile.tech_stack.insert(spec.name.to_string());
            } else {
                profile.secondary_skills.insert(spec.name.to_string());
            }
            if let Some(score) = ratio(count as f64, self.total) {
                profile.proficiency.insert(spec.name.to_string(), score);
            }
        }

        profile
    }

    fn productivity(&self) -> BTreeMap<String, f64> {
        [
            (COMMAND_VARIETY, self.distinct.len() as f64),
            (WORKFLOW_COMPLEXITY, self.workflow_matches as f64),
            (COMMAND_COMPLEXITY, self.complexity),
        ]
        .into_iter()
        .filter_map(|(name, value)| Some((name.to_string(), ratio(value, self.total)?)))
        .collect()
    }

    fn common_workflows(&self, threshold: usize) -> Vec<String> {
        let mut frequent: Vec<(&String, &usize)> = self
            .prefixes
            .iter()
            .filter(|(_, &count)| count > threshold)
            .collect();
        frequent.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        frequent
            .into_iter()
            .map(|(prefix, _)| {
                format!("You frequently use '{prefix}'. Consider creating an alias for this pattern")
            })
            .collect()
    }

    fn tool_usage(&self) -> ToolUsage {
        let mut usage = ToolUsage::default();
        for &(spec, count) in &self.tools {
            let bucket = match spec.kind {
                ToolKind::Editor => &mut usage.editors,
                ToolKind::Language => &mut usage.languages,
                ToolKind::BuildTool => &mut usage.build_tools,
                _ => continue,
            };
            bucket.insert(spec.name.to_string(), count);
        }
        usage
    }
}

/// `value / total` clamped to `[0, 1]`; `None` when `total` is zero.
fn ratio(value: f64, total: usize) -> Option<f64> {
    (total > 0).then(|| (value / total as f64).clamp(0.0, 1.0))
}

/// Pipes and redirections weigh 1, more than two fields weighs 0.5.
fn command_complexity(command: &str) -> f64 {
    let mut score = 0.0;
    if command.contains(&['|', '>', '<'][..]) {
        score += 1.0;
    }
    if command.split_whitespace().count() > 2 {
        score += 0.5;
    }
    score
}

/// Busiest hours first; equal counts list the earlier hour first.
pub fn peak_hours(hours: &[usize; 24]) -> Vec<u32> {
    let mut buckets: Vec<(u32, usize)> = (0u32..)
        .zip(hours.iter().copied())
        .filter(|&(_, count)| count > 0)
        .collect();
    buckets.sort_by(|a, b| b.1.cmp(&a.1));
    buckets
        .into_iter()
        .take(PEAK_HOURS)
        .map(|(hour, _)| hour)
        .collect()
}

fn recommendations(configs: &BTreeMap<Shell, ShellConfig>) -> Vec<String> {
    let mut out = Vec::new();
    for (shell, config) in configs {
        if config.aliases.len() < MIN_ALIASES {
            out.push(format!(
                "Consider adding more aliases to your {shell} configuration to improve productivity"
            ));
        }
        if config.plugins.len() < MIN_PLUGINS {
            out.push(format!(
                "Explore popular {shell} plugins to enhance your shell experience"
            ));
        }
    }
    out
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
