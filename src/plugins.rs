//! Shell plugin detection.
//!
//! Presence is the only signal: an existing plugin-manager directory or a
//! drop-in file counts as one plugin. Nothing is validated or recursed into.

use crate::model::PluginInfo;
use crate::{expand_path, Shell};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use tracing::debug;

fn last_updated(meta: &fs::Metadata) -> Option<DateTime<Local>> {
    meta.modified().ok().map(DateTime::<Local>::from)
}

/// Enumerate plugins installed for `shell`.
///
/// Plugin-manager directories come first in their fixed order, then drop-in
/// files sorted by name.
pub fn detect_plugins(shell: Shell, home: &Path) -> Vec<PluginInfo> {
    let mut plugins: Vec<PluginInfo> = shell
        .plugin_dirs()
        .iter()
        .filter_map(|&raw| {
            let path = expand_path(raw, home);
            let meta = fs::metadata(&path).ok().filter(fs::Metadata::is_dir)?;
            let name = Path::new(raw).file_name()?.to_string_lossy().into_owned();
            Some(PluginInfo {
                name,
                last_updated: last_updated(&meta),
                source: path,
            })
        })
        .collect();

    if let Some((raw_dir, extension)) = shell.plugin_drop_in() {
        plugins.extend(drop_in_plugins(&expand_path(raw_dir, home), extension));
    }

    debug!(%shell, count = plugins.len(), "plugins detected");
    plugins
}

/// One plugin per `*.<extension>` file directly inside `dir`.
fn drop_in_plugins(dir: &Path, extension: &str) -> Vec<PluginInfo> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut plugins: Vec<PluginInfo> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension()? != extension {
                return None;
            }
            let meta = entry.metadata().ok().filter(fs::Metadata::is_file)?;
            Some(PluginInfo {
                name: path.file_stem()?.to_string_lossy().into_owned(),
                last_updated: last_updated(&meta),
                source: path,
            })
        })
        .collect();

    plugins.sort_by(|a, b| a.name.cmp(&b.name));
    plugins
}
