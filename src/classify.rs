//! Command classification.
//!
//! Maps a command string to semantic categories and workflow patterns using
//! a static rule table, and attributes it to installed catalog tools.

use crate::{ToolInventory, ToolSpec};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Semantic command category.
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
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Category {
    /// Source control, containers and language toolchains
    Development,
    /// Privilege escalation, services and process inspection
    System,
    /// Filesystem navigation and manipulation
    File,
    /// Remote access and HTTP transfers
    Network,
    /// Package installation and management
    Package,
}

impl Category {
    /// Lowercase tag name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::System => "system",
            Self::File => "file",
            Self::Network => "network",
            Self::Package => "package",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Regex-recognized workflow pattern.
///
/// Matches of these patterns feed the "Workflow Complexity" score.
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
#[serde(rename_all = "snake_case")]
pub enum WorkflowPattern {
    /// `git commit|push|pull|merge`
    GitWorkflow,
    /// make, build or compile
    Build,
    /// deploy, kubectl or docker
    Deploy,
    /// test, spec or pytest
    Test,
}

impl WorkflowPattern {
    /// Snake-case pattern name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GitWorkflow => "git_workflow",
            Self::Build => "build",
            Self::Deploy => "deploy",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for WorkflowPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a rule assigns when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// A prefix-rule category.
    Category(Category),
    /// A regex-rule workflow pattern.
    Workflow(WorkflowPattern),
}

#[derive(Debug)]
enum Matcher {
    /// Fires when the command starts with any of the prefixes.
    Prefix(&'static [&'static str]),
    /// Fires when the regex matches anywhere in the command.
    Regex(Regex),
}

#[derive(Debug)]
struct Rule {
    tag: Tag,
    matcher: Matcher,
}

impl Rule {
    fn prefix(category: Category, prefixes: &'static [&'static str]) -> Self {
        Self {
            tag: Tag::Category(category),
            matcher: Matcher::Prefix(prefixes),
        }
    }

    fn regex(pattern: WorkflowPattern, re: &str) -> Self {
        Self {
            tag: Tag::Workflow(pattern),
            matcher: Matcher::Regex(Regex::new(re).expect("valid workflow regex")),
        }
    }

    fn matches(&self, command: &str) -> bool {
        match &self.matcher {
            Matcher::Prefix(prefixes) => {
                let command = command.trim_start();
                prefixes.iter().any(|prefix| command.starts_with(prefix))
            }
            Matcher::Regex(re) => re.is_match(command),
        }
    }
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::prefix(
            Category::Development,
            &["git", "docker", "npm", "go", "python"],
        ),
        Rule::prefix(Category::System, &["sudo", "systemctl", "ps", "top"]),
        Rule::prefix(Category::File, &["ls", "cd", "cp", "mv", "rm"]),
        Rule::prefix(Category::Network, &["ssh", "scp", "curl", "wget", "ping"]),
        Rule::prefix(
            Category::Package,
            &["apt", "brew", "pacman", "dnf", "pip", "cargo"],
        ),
        Rule::regex(WorkflowPattern::GitWorkflow, r"git (commit|push|pull|merge)"),
        Rule::regex(WorkflowPattern::Build, r"(make|build|compile)"),
        Rule::regex(WorkflowPattern::Deploy, r"(deploy|kubectl|docker)"),
        Rule::regex(WorkflowPattern::Test, r"test|spec|pytest"),
    ]
});

/// Tags assigned to one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Matched categories, in declaration order.
    pub categories: BTreeSet<Category>,
    /// Matched workflow patterns, in declaration order.
    pub workflows: BTreeSet<WorkflowPattern>,
}

impl Classification {
    /// Whether the given tag was assigned.
    pub fn has(&self, tag: Tag) -> bool {
        match tag {
            Tag::Category(c) => self.categories.contains(&c),
            Tag::Workflow(w) => self.workflows.contains(&w),
        }
    }
}

/// Classify a command against every rule.
///
/// All matching rules contribute; the result is a set, so rule order never
/// changes it.
///
/// ```rust
/// use shell_profiler::{classify, Category, Tag, WorkflowPattern};
///
/// let tags = classify("git commit -m x");
/// assert!(tags.has(Tag::Category(Category::Development)));
/// assert!(tags.has(Tag::Workflow(WorkflowPattern::GitWorkflow)));
/// ```
pub fn classify(command: &str) -> Classification {
    let mut out = Classification::default();
    for rule in RULES.iter().filter(|rule| rule.matches(command)) {
        match rule.tag {
            Tag::Category(c) => {
                out.categories.insert(c);
            }
            Tag::Workflow(w) => {
                out.workflows.insert(w);
            }
        }
    }
    out
}

/// Installed catalog tools that a command is attributable to.
///
/// Only tools the inventory reports as installed are eligible. Results keep
/// catalog order.
pub fn detect_tools<'a>(
    command: &'a str,
    inventory: &'a ToolInventory,
) -> impl Iterator<Item = &'static ToolSpec> + 'a {
    inventory
        .installed()
        .filter(move |spec| spec.matches(command))
}
