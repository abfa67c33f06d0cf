//! Shell configuration parsing.
//!
//! A best-effort static scan of rc/profile files for alias and environment
//! variable definitions. No shell expansion, no escapes, no continuation
//! lines.

use crate::model::{ConfigFileInfo, ShellConfig};
use crate::plugins::detect_plugins;
use crate::{expand_path, AnalysisError, Shell};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Aliases and environment variables found in one file.
#[derive(Debug, Default)]
pub struct ConfigScan {
    /// `alias` definitions.
    pub aliases: BTreeMap<String, String>,
    /// `export` (or fish `set -x`) definitions.
    pub environment: BTreeMap<String, String>,
    /// Lines that looked like definitions but could not be split.
    pub skipped: Vec<AnalysisError>,
}

/// Strip surrounding whitespace and any `'`/`"` characters at either end.
fn unquote(value: &str) -> &str {
    value.trim().trim_matches(|c| c == '\'' || c == '"')
}

/// Split `NAME=VALUE`; `None` when there is no `=` or the name is empty.
fn split_assignment(rest: &str) -> Option<(String, String)> {
    let (name, value) = rest.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), unquote(value).to_string()))
}

/// Fish spells definitions as `alias NAME VALUE` and `set -gx NAME VALUE`.
fn split_fish_words(rest: &str) -> Option<(String, String)> {
    let rest = rest.trim();
    let first = rest.split_whitespace().next()?;
    if first.contains('=') {
        return split_assignment(rest);
    }
    let (name, value) = rest.split_once(char::is_whitespace)?;
    let name = name.trim_end_matches('=');
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), unquote(value).to_string()))
}

fn fish_exported_var(rest: &str) -> Option<&str> {
    let mut words = rest.trim_start();
    let mut exported = false;
    while let Some(flag) = words.strip_prefix('-') {
        let (flag, tail) = flag.split_once(char::is_whitespace)?;
        exported |= match flag.strip_prefix('-') {
            Some(long) => long == "export",
            None => flag.contains('x'),
        };
        words = tail.trim_start();
    }
    exported.then_some(words)
}

/// Scan file content for `alias NAME=VALUE` and `export NAME=VALUE` lines.
///
/// Later definitions of the same name overwrite earlier ones. Quotes around
/// the value are stripped. Lines starting with `alias `/`export ` that do not
/// split are reported in [`ConfigScan::skipped`].
///
/// ```rust
/// use shell_profiler::{parse_config, Shell};
///
/// let scan = parse_config("alias ll='ls -la'\nexport PATH=$PATH:/x\n", Shell::Bash);
/// assert_eq!(scan.aliases["ll"], "ls -la");
/// assert_eq!(scan.environment["PATH"], "$PATH:/x");
/// ```
pub fn parse_config(content: &str, shell: Shell) -> ConfigScan {
    let mut scan = ConfigScan::default();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim_start();

        let (target, parsed) = if let Some(rest) = trimmed.strip_prefix("alias ") {
            let parsed = match shell {
                Shell::Fish => split_fish_words(rest),
                _ => split_assignment(rest),
            };
            (&mut scan.aliases, parsed)
        } else if let Some(rest) = trimmed.strip_prefix("export ") {
            (&mut scan.environment, split_assignment(rest))
        } else if let Some(rest) = trimmed
            .strip_prefix("set ")
            .filter(|_| shell == Shell::Fish)
        {
            match fish_exported_var(rest) {
                Some(rest) => (&mut scan.environment, split_fish_words(rest)),
                None => continue,
            }
        } else {
            continue;
        };

        match parsed {
            Some((name, value)) => {
                target.insert(name, value);
            }
            None => scan.skipped.push(AnalysisError::ParseSkipped {
                line_number: index + 1,
                line: trimmed.trim_end().to_string(),
            }),
        }
    }

    scan
}

fn modified(meta: &fs::Metadata) -> Option<DateTime<Local>> {
    meta.modified().ok().map(DateTime::<Local>::from)
}

/// Read one config path.
///
/// `Ok(None)` for missing paths and directories.
fn read_config_file(path: &Path) -> Result<Option<ConfigFileInfo>, AnalysisError> {
    let unavailable = |source| AnalysisError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(unavailable(e)),
    };
    if !meta.is_file() {
        return Ok(None);
    }
    let bytes = fs::read(path).map_err(unavailable)?;

    Ok(Some(ConfigFileInfo {
        path: path.to_path_buf(),
        modified: modified(&meta),
        content: String::from_utf8_lossy(&bytes).into_owned(),
    }))
}

/// Build the full configuration record for one shell.
///
/// Every config path that exists as a file is read and scanned in order, so
/// a definition in a later file overrides an earlier one. Plugins are then
/// detected. Missing paths are skipped; unreadable files are logged.
pub fn load_shell_config(shell: Shell, home: &Path) -> ShellConfig {
    let mut config = ShellConfig::default();

    for &raw_path in shell.config_paths() {
        let path = expand_path(raw_path, home);
        let info = match read_config_file(&path) {
            Ok(Some(info)) => info,
            Ok(None) => continue,
            Err(error) => {
                warn!(%shell, kind = error.kind(), "{error}");
                continue;
            }
        };

        let scan = parse_config(&info.content, shell);
        for skipped in &scan.skipped {
            debug!(%shell, file = raw_path, kind = skipped.kind(), "{skipped}");
        }
        config.aliases.extend(scan.aliases);
        config.environment.extend(scan.environment);
        config.config_files.insert(raw_path.to_string(), info);
    }

    config.plugins = detect_plugins(shell, home);
    debug!(
        %shell,
        files = config.config_files.len(),
        aliases = config.aliases.len(),
        environment = config.environment.len(),
        plugins = config.plugins.len(),
        "shell config loaded"
    );
    config
}
