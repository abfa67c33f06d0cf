//! Version output parsing with regex extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("valid version regex"));

/// Extract a semantic version (major.minor.patch) from probe output.
///
/// Handles the usual shapes:
///
/// - `Python 3.12.1` -> 3.12.1
/// - `git version 2.43.0` -> 2.43.0
/// - `v20.11.0` -> 20.11.0
///
/// Returns `None` when no complete version triple is present; a tool with
/// unparseable output is still considered installed.
pub(crate) fn parse_version(output: &str) -> Option<Version> {
    let caps = VERSION_RE.captures(output)?;
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_python_version() {
        assert_eq!(parse_version("Python 3.12.1"), Some(Version::new(3, 12, 1)));
    }

    #[test]
    fn test_parse_git_version() {
        assert_eq!(
            parse_version("git version 2.43.0\n"),
            Some(Version::new(2, 43, 0))
        );
    }

    #[test]
    fn test_parse_node_version() {
        assert_eq!(parse_version("v20.11.0"), Some(Version::new(20, 11, 0)));
    }

    #[test]
    fn test_parse_leading_zero_component() {
        // semver rejects "01", the numeric parse does not
        assert_eq!(parse_version("tool 1.02.3"), Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_parse_version_multiline() {
        let output = "GNU Make 4.4.1\nBuilt for x86_64-pc-linux-gnu";
        assert_eq!(parse_version(output), Some(Version::new(4, 4, 1)));
    }

    #[test]
    fn test_parse_version_incomplete() {
        assert_eq!(parse_version("tmux 3.4"), None);
        assert_eq!(parse_version("no version here"), None);
    }
}
