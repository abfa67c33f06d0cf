//! Shell family enum identifying supported interactive shells.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

/// An interactive shell family.
///
/// Each variant knows where its history, configuration files and plugin
/// managers live. Paths are returned home-relative (`~/...`) and resolved
/// against a home directory with [`expand_path`].
///
/// # Example
///
/// ```rust
/// use shell_profiler::Shell;
///
/// for shell in Shell::all() {
///     println!("{}: {}", shell.name(), shell.history_path());
/// }
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    /// GNU Bourne-Again shell
    Bash,
    /// Z shell
    Zsh,
    /// Friendly interactive shell
    Fish,
}

impl Shell {
    /// Lowercase shell name, as used in messages and reports.
    ///
    /// ```rust
    /// use shell_profiler::Shell;
    ///
    /// assert_eq!(Shell::Zsh.name(), "zsh");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
        }
    }

    /// Default history file location.
    pub fn history_path(&self) -> &'static str {
        match self {
            Self::Bash => "~/.bash_history",
            Self::Zsh => "~/.zsh_history",
            Self::Fish => "~/.local/share/fish/fish_history",
        }
    }

    /// Configuration files and directories inspected for this shell.
    ///
    /// Directories in this list are never parsed; they are covered by plugin
    /// detection.
    pub fn config_paths(&self) -> &'static [&'static str] {
        match self {
            Self::Bash => &["~/.bashrc", "~/.bash_profile", "~/.bash_aliases"],
            Self::Zsh => &["~/.zshrc", "~/.zsh_plugins", "~/.zprofile"],
            Self::Fish => &[
                "~/.config/fish/config.fish",
                "~/.config/fish/functions",
                "~/.config/fish/conf.d",
            ],
        }
    }

    /// Plugin-manager directories whose presence marks an installed plugin.
    pub fn plugin_dirs(&self) -> &'static [&'static str] {
        match self {
            Self::Bash => &["~/.bash_it", "~/.local/share/bash-completion"],
            Self::Zsh => &["~/.oh-my-zsh", "~/.antigen", "~/.zinit", "~/.zplug"],
            Self::Fish => &[],
        }
    }

    /// Drop-in directory whose individual files count as plugins.
    pub fn plugin_drop_in(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Fish => Some(("~/.config/fish/conf.d", "fish")),
            _ => None,
        }
    }

    /// Iterator over all supported shells, in a fixed order.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a leading `~/` against `home`.
///
/// Paths without the prefix are returned unchanged.
pub fn expand_path(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}
