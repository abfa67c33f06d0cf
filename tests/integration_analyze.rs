//! Integration tests for the analysis pipeline.
//!
//! Every test points the pipeline at a temporary home directory and a fixed
//! tool inventory, so results do not depend on the host.

use shell_profiler::{
    analyze_with_inventory, spawn_analysis, AnalyzeOptions, Category, CommandExtraction, Shell, TimeSource,
    ToolInventory, WorkflowPattern, COMMAND_VARIETY,
};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn home_with(files: &[(&str, &str)]) -> TempDir {
    let home = tempfile::tempdir().unwrap();
    for (rel, content) in files {
        let path = home.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    home
}

fn options(home: &Path, extraction: CommandExtraction) -> AnalyzeOptions {
    AnalyzeOptions {
        extraction,
        home_dir: Some(home.to_path_buf()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_missing_history_leaves_shell_absent() {
    let home = home_with(&[
        (".bash_history", "ls -la\ncd src\n"),
        (".zsh_history", ": 1700000000:0;git status\n: 1700000060:0;make build\n"),
    ]);

    let snapshot = analyze_with_inventory(
        options(home.path(), CommandExtraction::FullLine),
        ToolInventory::default(),
    )
    .await;

    assert!(snapshot.histories.contains_key(&Shell::Bash));
    assert!(snapshot.histories.contains_key(&Shell::Zsh));
    assert!(!snapshot.histories.contains_key(&Shell::Fish));
    // configuration is reported for every shell
    assert_eq!(snapshot.shell_configs.len(), 3);
    assert_eq!(snapshot.total_commands(), 4);

    let zsh = &snapshot.histories[&Shell::Zsh];
    assert_eq!(zsh[0].text, "git status");
    assert_eq!(zsh[0].time_source, TimeSource::Recorded);
    assert!(zsh[1].workflows.contains(&WorkflowPattern::Build));

    let bash = &snapshot.histories[&Shell::Bash];
    assert_eq!(bash[0].time_source, TimeSource::Captured);
    assert!(bash[0].categories.contains(&Category::File));
}

#[tokio::test]
async fn test_empty_home_yields_empty_insights() {
    let home = tempfile::tempdir().unwrap();

    let snapshot = analyze_with_inventory(
        options(home.path(), CommandExtraction::LastToken),
        ToolInventory::with_installed(["python", "git"]),
    )
    .await;

    assert!(snapshot.histories.is_empty());
    assert_eq!(snapshot.total_commands(), 0);

    let insights = &snapshot.insights;
    assert_eq!(insights.technical_profile.primary_role, None);
    assert!(insights.technical_profile.proficiency.is_empty());
    assert!(insights.technical_profile.tech_stack.is_empty());
    assert!(insights.work_patterns.peak_hours.is_empty());
    assert!(insights.work_patterns.productivity.is_empty());
    assert!(insights.work_patterns.common_workflows.is_empty());
}

#[tokio::test]
async fn test_full_line_profile() {
    let history = "\
python app.py
python -m venv .venv
ls -la
python manage.py runserver
git status
cd project
python3 script.py
vim notes.md
git diff
make test
";
    let home = home_with(&[(".bash_history", history)]);

    let snapshot = analyze_with_inventory(
        options(home.path(), CommandExtraction::FullLine),
        ToolInventory::with_installed(["python", "git", "vim"]),
    )
    .await;

    assert_eq!(snapshot.total_commands(), 10);

    let profile = &snapshot.insights.technical_profile;
    assert_eq!(profile.primary_role.as_deref(), Some("Python Developer"));
    assert_eq!(profile.proficiency["python"], 0.4);
    assert_eq!(profile.proficiency["git"], 0.2);
    assert!(profile.tech_stack.contains("python"));
    assert!(profile.secondary_skills.contains("git"));
    assert!(profile.secondary_skills.contains("vim"));
    assert!(!profile.proficiency.contains_key("docker"));
    assert!(profile.proficiency.values().all(|p| (0.0..=1.0).contains(p)));

    let usage = &snapshot.insights.tool_usage;
    assert_eq!(usage.languages["python"], 4);
    assert_eq!(usage.editors["vim"], 1);

    let patterns = &snapshot.insights.work_patterns;
    assert_eq!(patterns.peak_hours.len(), 1);
    assert_eq!(patterns.productivity[COMMAND_VARIETY], 1.0);
}

#[tokio::test]
async fn test_last_token_drops_arguments() {
    let home = home_with(&[(".bash_history", "git commit -m fix\n   \n\nls\n")]);

    let snapshot = analyze_with_inventory(
        options(home.path(), CommandExtraction::LastToken),
        ToolInventory::default(),
    )
    .await;

    let texts: Vec<_> = snapshot.histories[&Shell::Bash]
        .iter()
        .map(|record| record.text.as_str())
        .collect();
    assert_eq!(texts, vec!["fix", "ls"]);
}

#[tokio::test]
async fn test_config_flows_into_snapshot() {
    let home = home_with(&[
        (".zshrc", "alias ll='ls -la'\nexport PATH=$PATH:/x\nalias broken\n"),
        (".oh-my-zsh/README.md", ""),
        (".config/fish/config.fish", "alias g git\nset -gx EDITOR vim\n"),
    ]);

    let snapshot = analyze_with_inventory(
        options(home.path(), CommandExtraction::LastToken),
        ToolInventory::default(),
    )
    .await;

    let zsh = &snapshot.shell_configs[&Shell::Zsh];
    assert_eq!(zsh.aliases["ll"], "ls -la");
    assert_eq!(zsh.environment["PATH"], "$PATH:/x");
    assert_eq!(zsh.aliases.len(), 1);
    assert!(zsh.config_files.contains_key("~/.zshrc"));
    assert_eq!(zsh.plugins.len(), 1);
    assert_eq!(zsh.plugins[0].name, ".oh-my-zsh");

    let fish = &snapshot.shell_configs[&Shell::Fish];
    assert_eq!(fish.aliases["g"], "git");
    assert_eq!(fish.environment["EDITOR"], "vim");

    let recommendations = &snapshot.insights.recommendations;
    assert!(recommendations
        .iter()
        .any(|r| r.contains("aliases") && r.contains("zsh")));
    assert!(recommendations
        .iter()
        .any(|r| r.contains("plugins") && r.contains("bash")));
}

#[tokio::test]
async fn test_snapshot_serializes() {
    let home = home_with(&[(".bash_history", "#1700000000\ndocker ps\n")]);

    let snapshot = analyze_with_inventory(
        options(home.path(), CommandExtraction::FullLine),
        ToolInventory::with_installed(["docker"]),
    )
    .await;

    let record = &snapshot.histories[&Shell::Bash][0];
    assert_eq!(record.time_source, TimeSource::Recorded);
    assert!(record.workflows.contains(&WorkflowPattern::Deploy));

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["histories"]["bash"][0]["text"], "docker ps");
    assert_eq!(json["histories"]["bash"][0]["time_source"], "recorded");
    assert!(json["shell_configs"]["fish"].is_object());
}

#[tokio::test]
async fn test_spawned_analysis_delivers_one_snapshot() {
    let home = home_with(&[(".zsh_history", ": 1700000000:0;git status\n")]);
    let options = AnalyzeOptions {
        probe_timeout: Duration::from_millis(500),
        ..options(home.path(), CommandExtraction::FullLine)
    };

    let snapshot = spawn_analysis(options).await.unwrap();

    assert_eq!(snapshot.histories.keys().collect::<Vec<_>>(), vec![&Shell::Zsh]);
    assert_eq!(snapshot.histories[&Shell::Zsh][0].text, "git status");
    assert_eq!(snapshot.shell_configs.len(), 3);
    // every catalog tool gets a result, installed or not
    assert!(!snapshot.tools.tools().is_empty());
}
