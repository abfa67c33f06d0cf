//! shell-profiler - analyze shell history and configuration.

use anyhow::{Context, Result};
use clap::Parser;
use shell_profiler::logging::{self, LogConfig, LogFormat};
use shell_profiler::{spawn_analysis, AnalysisSnapshot, AnalyzeOptions, CommandExtraction};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Shell history and configuration profiler.
#[derive(Parser, Debug)]
#[command(name = "shell-profiler")]
#[command(about = "Profile shell usage from history and configuration files")]
#[command(version)]
struct Cli {
    /// Print the full snapshot as JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// Keep whole history lines instead of only their last token
    #[arg(long)]
    full_commands: bool,

    /// Diagnostic log file (appended to)
    #[arg(long, value_name = "PATH", default_value = "shell_analyzer.log")]
    log_file: PathBuf,

    /// Log output format
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Timeout for each tool probe, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 2000)]
    probe_timeout_ms: u64,
}

impl Cli {
    fn options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            probe_timeout: Duration::from_millis(self.probe_timeout_ms),
            extraction: if self.full_commands {
                CommandExtraction::FullLine
            } else {
                CommandExtraction::LastToken
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogConfig {
        path: cli.log_file.clone(),
        debug: cli.debug,
        format: cli.log_format,
    })?;
    tracing::info!(json = cli.json, full_commands = cli.full_commands, "starting analysis");

    let rx = spawn_analysis(cli.options());
    let snapshot = tokio::select! {
        received = rx => received.context("analysis task ended without a result")?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted before analysis finished");
            return Ok(());
        }
    };

    if cli.json {
        let out = serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;
        println!("{out}");
    } else {
        print_report(&snapshot);
    }
    Ok(())
}

fn print_report(snapshot: &AnalysisSnapshot) {
    println!("Shell analysis ({})", snapshot.captured_at.format("%Y-%m-%d %H:%M"));
    println!("Total commands: {}", snapshot.total_commands());

    println!("\n== Overview ==");
    for (shell, config) in &snapshot.shell_configs {
        match snapshot.histories.get(shell) {
            Some(history) => {
                let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
                for record in history {
                    for category in &record.categories {
                        *categories.entry(category.name()).or_default() += 1;
                    }
                }
                println!("{shell}: {} commands", history.len());
                for (name, count) in categories {
                    println!("  {name}: {count}");
                }
            }
            None => println!("{shell}: no history"),
        }
        println!(
            "  {} config files, {} aliases, {} env vars, {} plugins",
            config.config_files.len(),
            config.aliases.len(),
            config.environment.len(),
            config.plugins.len()
        );
    }

    let insights = &snapshot.insights;
    let profile = &insights.technical_profile;
    println!("\n== Technical Profile ==");
    println!("Primary role: {}", profile.primary_role.as_deref().unwrap_or("unknown"));
    println!("Tech stack: {}", join(profile.tech_stack.iter()));
    println!("Secondary skills: {}", join(profile.secondary_skills.iter()));
    for (tool, score) in &profile.proficiency {
        println!("  {tool}: {:.0}%", score * 100.0);
    }

    let patterns = &insights.work_patterns;
    println!("\n== Work Patterns ==");
    let hours: Vec<String> = patterns.peak_hours.iter().map(|h| format!("{h:02}:00")).collect();
    println!("Peak hours: {}", join(hours.iter()));
    for (metric, score) in &patterns.productivity {
        println!("  {metric}: {score:.2}");
    }
    for workflow in &patterns.common_workflows {
        println!("  {workflow}");
    }

    println!("\n== Tool Usage ==");
    for (label, usage) in [
        ("Editors", &insights.tool_usage.editors),
        ("Languages", &insights.tool_usage.languages),
        ("Build tools", &insights.tool_usage.build_tools),
    ] {
        let entries: Vec<String> = usage.iter().map(|(name, n)| format!("{name} ({n})")).collect();
        println!("{label}: {}", join(entries.iter()));
    }

    if !insights.recommendations.is_empty() {
        println!("\n== Recommendations ==");
        for recommendation in &insights.recommendations {
            println!("- {recommendation}");
        }
    }
}

fn join<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let joined = items.map(String::as_str).collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}
