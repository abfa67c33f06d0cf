//! Shell history reading.
//!
//! Streams a history file line by line, strips shell-specific metadata
//! (timestamps) and cleans each line into a command according to the
//! configured [`CommandExtraction`] policy.

use crate::classify::classify;
use crate::model::{CommandRecord, TimeSource};
use crate::{AnalysisError, CommandExtraction, Shell};
use chrono::{DateTime, Local, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// zsh EXTENDED_HISTORY: `: <epoch>:<elapsed>;<command>`
static ZSH_EXTENDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:\s*(\d+):\d+;(.*)$").expect("valid zsh history regex"));

/// Clean a raw history line into a command.
///
/// Returns `None` when nothing but whitespace remains.
///
/// ```rust
/// use shell_profiler::{clean_line, CommandExtraction};
///
/// assert_eq!(clean_line("  git commit -m x ", CommandExtraction::LastToken), Some("x".into()));
/// assert_eq!(
///     clean_line("git   status", CommandExtraction::FullLine),
///     Some("git status".into())
/// );
/// assert_eq!(clean_line("   ", CommandExtraction::LastToken), None);
/// ```
pub fn clean_line(line: &str, extraction: CommandExtraction) -> Option<String> {
    let cleaned = match extraction {
        CommandExtraction::LastToken => line.split_whitespace().last()?.to_string(),
        CommandExtraction::FullLine => line.split_whitespace().collect::<Vec<_>>().join(" "),
    };
    (!cleaned.is_empty()).then_some(cleaned)
}

/// A raw history line after shell-specific metadata is recognized.
#[derive(Debug, PartialEq, Eq)]
enum Entry<'a> {
    /// A command, possibly with its own timestamp.
    Command(&'a str, Option<DateTime<Local>>),
    /// A timestamp belonging to an adjacent command.
    Time(DateTime<Local>),
    /// Format noise.
    Skip,
}

fn epoch(secs: &str) -> Option<DateTime<Local>> {
    let secs = secs.trim().parse::<i64>().ok()?;
    Local.timestamp_opt(secs, 0).single()
}

fn parse_entry(shell: Shell, line: &str) -> Entry<'_> {
    match shell {
        Shell::Bash => match line.trim().strip_prefix('#').and_then(epoch) {
            Some(time) => Entry::Time(time),
            None => Entry::Command(line, None),
        },
        Shell::Zsh => match ZSH_EXTENDED.captures(line) {
            Some(caps) => {
                let time = caps.get(1).and_then(|m| epoch(m.as_str()));
                let command = caps.get(2).map_or("", |m| m.as_str());
                Entry::Command(command, time)
            }
            None => Entry::Command(line, None),
        },
        Shell::Fish => {
            let trimmed = line.trim_start();
            if let Some(command) = trimmed.strip_prefix("- cmd:") {
                Entry::Command(command, None)
            } else if let Some(time) = trimmed.strip_prefix("when:").and_then(epoch) {
                Entry::Time(time)
            } else {
                Entry::Skip
            }
        }
    }
}

struct Draft {
    text: String,
    time: Option<DateTime<Local>>,
}

/// Read and clean one shell's history file.
///
/// Bash `#<epoch>` lines time the following command; fish `when:` lines
/// time the preceding one; zsh extended lines carry their own. Commands
/// without recorded time get the capture time as placeholder.
///
/// # Errors
///
/// `SourceUnavailable` when the file cannot be opened or read. Callers treat
/// this as "shell not used on this host".
pub fn read_history(
    shell: Shell,
    path: &Path,
    extraction: CommandExtraction,
) -> Result<Vec<CommandRecord>, AnalysisError> {
    let unavailable = |source| AnalysisError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unavailable)?;
    let captured = Local::now();
    let mut drafts: Vec<Draft> = Vec::new();
    let mut pending_time = None;

    for raw in BufReader::new(file).split(b'\n') {
        let raw = raw.map_err(unavailable)?;
        let line = String::from_utf8_lossy(&raw);

        match parse_entry(shell, &line) {
            Entry::Command(command, time) => {
                // blank lines leave a pending bash timestamp for the next command
                if let Some(text) = clean_line(command, extraction) {
                    let time = time.or_else(|| pending_time.take());
                    drafts.push(Draft { text, time });
                }
            }
            Entry::Time(time) if shell == Shell::Fish => {
                if let Some(last) = drafts.last_mut().filter(|d| d.time.is_none()) {
                    last.time = Some(time);
                }
            }
            Entry::Time(time) => pending_time = Some(time),
            Entry::Skip => {}
        }
    }

    let records: Vec<CommandRecord> = drafts
        .into_iter()
        .map(|draft| {
            let tags = classify(&draft.text);
            let (time, time_source) = match draft.time {
                Some(time) => (time, TimeSource::Recorded),
                None => (captured, TimeSource::Captured),
            };
            CommandRecord {
                text: draft.text,
                time: Some(time),
                time_source,
                categories: tags.categories,
                workflows: tags.workflows,
            }
        })
        .collect();

    debug!(%shell, path = %path.display(), commands = records.len(), "history read");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use chrono::Timelike;
    use std::io::Write;

    fn write_history(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_clean_line_last_token() {
        assert_eq!(
            clean_line("1700000000 git status", CommandExtraction::LastToken),
            Some("status".to_string())
        );
        assert_eq!(clean_line("ls", CommandExtraction::LastToken), Some("ls".to_string()));
        assert_eq!(clean_line(" \t ", CommandExtraction::LastToken), None);
        assert_eq!(clean_line("", CommandExtraction::FullLine), None);
    }

    #[test]
    fn test_clean_line_full_line_collapses_whitespace() {
        assert_eq!(
            clean_line("  docker   compose\tup  ", CommandExtraction::FullLine),
            Some("docker compose up".to_string())
        );
    }

    #[test]
    fn test_parse_zsh_extended() {
        match parse_entry(Shell::Zsh, ": 1700000000:0;git status") {
            Entry::Command(command, time) => {
                assert_eq!(command, "git status");
                assert_eq!(time.unwrap().timestamp(), 1_700_000_000);
            }
            other => panic!("unexpected entry: {other:?}"),
        }
        assert_eq!(parse_entry(Shell::Zsh, "ls -la"), Entry::Command("ls -la", None));
    }

    #[test]
    fn test_parse_bash_timestamp_comment() {
        assert!(matches!(parse_entry(Shell::Bash, "#1700000000"), Entry::Time(_)));
        // a comment that is not an epoch is just a command line
        assert_eq!(
            parse_entry(Shell::Bash, "# not a time"),
            Entry::Command("# not a time", None)
        );
    }

    #[test]
    fn test_parse_fish_entries() {
        assert_eq!(
            parse_entry(Shell::Fish, "- cmd: cargo test"),
            Entry::Command(" cargo test", None)
        );
        assert!(matches!(parse_entry(Shell::Fish, "  when: 1700000000"), Entry::Time(_)));
        assert_eq!(parse_entry(Shell::Fish, "  paths:"), Entry::Skip);
        assert_eq!(parse_entry(Shell::Fish, "    - ~/src"), Entry::Skip);
    }

    #[test]
    fn test_read_plain_history_drops_blank_lines() {
        let file = write_history("ls -la\n\n   \ncd /tmp\nrm -rf tmp\n");
        let records = read_history(Shell::Bash, file.path(), CommandExtraction::FullLine).unwrap();

        let texts: Vec<_> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["ls -la", "cd /tmp", "rm -rf tmp"]);
        assert!(records.iter().all(|r| r.time_source == TimeSource::Captured));
        assert!(records.iter().all(|r| r.time.is_some()));
        assert!(records[2].categories.contains(&Category::File));
    }

    #[test]
    fn test_read_last_token_policy() {
        let file = write_history("git commit -m fix\n");
        let records = read_history(Shell::Bash, file.path(), CommandExtraction::LastToken).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "fix");
    }

    #[test]
    fn test_read_bash_timestamps_apply_to_next_command() {
        let file = write_history("#1700000000\ngit status\nls\n");
        let records = read_history(Shell::Bash, file.path(), CommandExtraction::FullLine).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].time_source, TimeSource::Recorded);
        assert_eq!(records[0].time.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(records[1].time_source, TimeSource::Captured);
    }

    #[test]
    fn test_read_bash_timestamp_survives_blank_line() {
        let file = write_history("#1700000000\n\n   \ngit status\n");
        let records = read_history(Shell::Bash, file.path(), CommandExtraction::FullLine).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "git status");
        assert_eq!(records[0].time_source, TimeSource::Recorded);
        assert_eq!(records[0].time.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_read_fish_history() {
        let file = write_history(
            "- cmd: git push\n  when: 1700000000\n  paths:\n    - src\n- cmd: ls\n",
        );
        let records = read_history(Shell::Fish, file.path(), CommandExtraction::FullLine).unwrap();

        let texts: Vec<_> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["git push", "ls"]);
        assert_eq!(records[0].time_source, TimeSource::Recorded);
        assert_eq!(records[1].time_source, TimeSource::Captured);
    }

    #[test]
    fn test_read_zsh_hour_from_metadata() {
        let time = Local.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap();
        let file = write_history(&format!(": {}:0;make build\n", time.timestamp()));
        let records = read_history(Shell::Zsh, file.path(), CommandExtraction::FullLine).unwrap();

        assert_eq!(records[0].text, "make build");
        assert_eq!(records[0].time.unwrap().hour(), 14);
    }

    #[test]
    fn test_read_invalid_utf8_is_lossy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"echo caf\xe9\nls\n").unwrap();
        let records = read_history(Shell::Bash, file.path(), CommandExtraction::FullLine).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text, "ls");
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let result = read_history(
            Shell::Zsh,
            Path::new("/nonexistent/.zsh_history"),
            CommandExtraction::LastToken,
        );
        assert!(matches!(result, Err(AnalysisError::SourceUnavailable { .. })));
    }
}
