//! Environment probing.
//!
//! Detects which catalog tools are present on the host. A tool is present
//! iff its probe command exits successfully within the timeout. Every
//! failure mode (missing binary, permission denied, timeout, non-zero exit)
//! means "absent" and is only logged.
//!
//! - `catalog`: the static tool table
//! - `find_executable`: PATH-based lookup with fallbacks
//! - `run_probe`: timeout-bounded subprocess execution
//! - `parse_version`: regex version extraction from probe output

mod catalog;
mod parser;
mod path_finder;
mod runner;

pub use catalog::{lookup, ToolKind, ToolSpec, CATALOG};

use crate::{AnalysisError, AnalyzeOptions, ProbeFailure};
use futures::stream::{self, StreamExt};
use parser::parse_version;
use path_finder::find_executable;
use runner::run_probe;
use semver::Version;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Probe result for one catalog tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolPresence {
    #[serde(skip)]
    spec: &'static ToolSpec,
    /// Catalog name.
    pub name: &'static str,
    /// Catalog grouping.
    pub kind: ToolKind,
    /// Whether the probe succeeded.
    pub installed: bool,
    /// Resolved probe program, when it was found.
    pub path: Option<PathBuf>,
    /// Version parsed from probe output, when recognizable.
    pub version: Option<Version>,
}

impl ToolPresence {
    fn absent(spec: &'static ToolSpec) -> Self {
        Self {
            spec,
            name: spec.name,
            kind: spec.kind,
            installed: false,
            path: None,
            version: None,
        }
    }

    /// The catalog entry this result belongs to.
    pub fn spec(&self) -> &'static ToolSpec {
        self.spec
    }
}

/// Probe results for a whole catalog, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolInventory {
    tools: Vec<ToolPresence>,
}

impl ToolInventory {
    fn new(tools: Vec<ToolPresence>) -> Self {
        Self { tools }
    }

    /// Inventory in which exactly the named catalog tools are installed.
    ///
    /// Unknown names are ignored. Useful when the host should not be probed.
    ///
    /// ```rust
    /// use shell_profiler::ToolInventory;
    ///
    /// let inventory = ToolInventory::with_installed(["python", "git"]);
    /// assert!(inventory.is_installed("git"));
    /// assert!(!inventory.is_installed("docker"));
    /// ```
    pub fn with_installed<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = names.into_iter().collect();
        let tools = CATALOG
            .iter()
            .map(|spec| ToolPresence {
                installed: names.contains(&spec.name),
                ..ToolPresence::absent(spec)
            })
            .collect();
        Self { tools }
    }

    /// All probe results, installed or not.
    pub fn tools(&self) -> &[ToolPresence] {
        &self.tools
    }

    /// Catalog entries of the installed tools, in catalog order.
    pub fn installed(&self) -> impl Iterator<Item = &'static ToolSpec> + '_ {
        self.tools
            .iter()
            .filter(|tool| tool.installed)
            .map(ToolPresence::spec)
    }

    /// Whether the named tool was found.
    pub fn is_installed(&self, name: &str) -> bool {
        self.tools
            .iter()
            .any(|tool| tool.name == name && tool.installed)
    }
}

/// Probe a single catalog tool.
///
/// # Detection Process
///
/// 1. Resolve the probe program on PATH and fallback locations
/// 2. Run the probe command with `limit` as timeout
/// 3. Parse a semantic version from the output, if any
///
/// Never fails: every error yields an absent `ToolPresence`.
pub async fn probe_tool(spec: &'static ToolSpec, home: &Path, limit: Duration) -> ToolPresence {
    match try_probe(spec, home, limit).await {
        Ok(presence) => presence,
        Err(reason) => {
            let error = AnalysisError::ProbeFailed {
                tool: spec.name.to_string(),
                reason,
            };
            debug!(kind = error.kind(), "{error}");
            ToolPresence::absent(spec)
        }
    }
}

async fn try_probe(
    spec: &'static ToolSpec,
    home: &Path,
    limit: Duration,
) -> Result<ToolPresence, ProbeFailure> {
    let (program, args) = spec.probe_argv();
    let path = find_executable(program, home).ok_or(ProbeFailure::NotFound)?;
    let output = run_probe(&path, &args, limit).await?;

    Ok(ToolPresence {
        installed: true,
        version: parse_version(&output),
        path: Some(path),
        ..ToolPresence::absent(spec)
    })
}

/// Probe every tool in `catalog`.
///
/// Probes run concurrently, at most `options.probe_concurrency` at a time,
/// so the total time is bounded by roughly
/// `catalog.len() / concurrency * probe_timeout`. Results keep catalog order.
pub async fn probe_all(catalog: &'static [ToolSpec], options: &AnalyzeOptions) -> ToolInventory {
    let home = options.resolve_home();
    let limit = options.probe_timeout;
    let home = &home;

    let probes: Vec<_> = catalog
        .iter()
        .map(|spec| probe_tool(spec, home, limit))
        .collect();
    let tools: Vec<ToolPresence> = stream::iter(probes)
        .buffered(options.probe_concurrency.max(1))
        .collect()
        .await;

    let inventory = ToolInventory::new(tools);
    info!(
        probed = catalog.len(),
        installed = inventory.installed().count(),
        "environment probe finished"
    );
    inventory
}
