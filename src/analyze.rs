//! Analysis pipeline.

use crate::config::load_shell_config;
use crate::history::read_history;
use crate::insights::InsightAccumulator;
use crate::model::{AnalysisSnapshot, CommandRecord, ShellConfig};
use crate::probe::{probe_all, CATALOG};
use crate::{expand_path, AnalyzeOptions, CommandExtraction, Shell, ToolInventory};
use chrono::Local;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::oneshot;
use tokio::task;
use tracing::{debug, info, warn};

/// Everything read for one shell family.
#[derive(Debug)]
struct ShellAnalysis {
    shell: Shell,
    /// `None` when the history file is unavailable.
    history: Option<Vec<CommandRecord>>,
    config: ShellConfig,
}

fn analyze_shell(shell: Shell, home: &Path, extraction: CommandExtraction) -> ShellAnalysis {
    let path = expand_path(shell.history_path(), home);
    let history = match read_history(shell, &path, extraction) {
        Ok(records) => Some(records),
        Err(error) => {
            // a missing history just means the shell is not used here
            info!(%shell, kind = error.kind(), "{error}");
            None
        }
    };

    ShellAnalysis {
        shell,
        history,
        config: load_shell_config(shell, home),
    }
}

/// Read every shell concurrently on the blocking pool.
///
/// A shell whose task panics is logged and left out; the others are
/// unaffected.
async fn read_shells(home: PathBuf, extraction: CommandExtraction) -> Vec<ShellAnalysis> {
    let tasks: Vec<_> = Shell::all()
        .map(|shell| {
            let home = home.clone();
            task::spawn_blocking(move || analyze_shell(shell, &home, extraction))
        })
        .collect();

    join_all(tasks)
        .await
        .into_iter()
        .filter_map(|joined| match joined {
            Ok(analysis) => Some(analysis),
            Err(error) => {
                warn!(%error, "shell analysis task failed");
                None
            }
        })
        .collect()
}

/// Merge per-shell results and aggregate insights into one snapshot.
fn assemble(
    shells: Vec<ShellAnalysis>,
    inventory: ToolInventory,
    options: &AnalyzeOptions,
) -> AnalysisSnapshot {
    let mut histories = BTreeMap::new();
    let mut shell_configs = BTreeMap::new();

    for analysis in shells {
        if let Some(history) = analysis.history {
            histories.insert(analysis.shell, history);
        }
        shell_configs.insert(analysis.shell, analysis.config);
    }

    let mut acc = InsightAccumulator::new(&inventory);
    for history in histories.values() {
        acc.observe_all(history);
    }
    debug!(commands = acc.total(), "aggregating insights");
    let insights = acc.finish(&shell_configs, options);

    info!(
        histories = histories.len(),
        commands = histories.values().map(Vec::len).sum::<usize>(),
        "shell analysis completed"
    );

    AnalysisSnapshot {
        histories,
        shell_configs,
        insights,
        tools: inventory,
        captured_at: Local::now(),
    }
}

/// Run a full analysis pass.
///
/// The environment probe and the per-shell reads run concurrently; insights
/// are aggregated once both are done. Never fails: unavailable sources and
/// failed probes degrade to absent data.
///
/// # Example
///
/// ```rust,no_run
/// use shell_profiler::{analyze, AnalyzeOptions};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let snapshot = analyze(AnalyzeOptions::default()).await;
///     for (shell, history) in &snapshot.histories {
///         println!("{shell}: {} commands", history.len());
///     }
/// }
/// ```
pub async fn analyze(options: AnalyzeOptions) -> AnalysisSnapshot {
    let home = options.resolve_home();
    let (inventory, shells) = tokio::join!(
        probe_all(CATALOG, &options),
        read_shells(home, options.extraction)
    );
    assemble(shells, inventory, &options)
}

/// Run an analysis pass against a known tool inventory, without probing.
pub async fn analyze_with_inventory(
    options: AnalyzeOptions,
    inventory: ToolInventory,
) -> AnalysisSnapshot {
    let shells = read_shells(options.resolve_home(), options.extraction).await;
    assemble(shells, inventory, &options)
}

/// Launch [`analyze`] as a background task.
///
/// The receiver yields exactly one snapshot. Dropping it does not cancel the
/// task; the finished snapshot is then discarded.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_analysis(options: AnalyzeOptions) -> oneshot::Receiver<AnalysisSnapshot> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let snapshot = analyze(options).await;
        if tx.send(snapshot).is_err() {
            debug!("analysis consumer went away before the snapshot was ready");
        }
    });
    rx
}
