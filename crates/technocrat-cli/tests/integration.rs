#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A fresh project directory named `acme` inside `dir`.
fn project(dir: &TempDir) -> PathBuf {
    let root = dir.path().join("acme");
    std::fs::create_dir_all(&root).unwrap();
    root
}

fn technocrat(start: &Path) -> Command {
    let mut cmd = Command::cargo_bin("technocrat").unwrap();
    cmd.current_dir(start).env("TECHNOCRAT_ROOT", start);
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// technocrat init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_workspace_tree() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    technocrat(&root)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized technocrat"));

    assert!(root.join("specs").is_dir());
    assert!(root.join("templates/spec-template.md").exists());
    assert!(root.join("templates/plan-template.md").exists());
    assert!(root.join("templates/tasks-template.md").exists());
    assert!(root.join(".technocrat/config.yaml").exists());
    let constitution = std::fs::read_to_string(root.join("memory/constitution.md")).unwrap();
    assert!(constitution.starts_with("# acme Constitution"));
}

#[test]
fn init_installs_agent_scaffolding() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    technocrat(&root)
        .args(["init", "--agent", "claude", "--agent", "gemini"])
        .assert()
        .success();

    let plan = std::fs::read_to_string(root.join(".claude/commands/technocrat.plan.md")).unwrap();
    assert!(plan.contains("technocrat prompt plan --input \"$ARGUMENTS\""));
    let toml = std::fs::read_to_string(root.join(".gemini/commands/technocrat.plan.toml")).unwrap();
    assert!(toml.contains("{{args}}"));

    let claude_md = std::fs::read_to_string(root.join("CLAUDE.md")).unwrap();
    assert!(claude_md.contains("<!-- technocrat:start -->"));
    assert!(claude_md.contains("# acme Development Guidelines"));
    assert!(root.join("GEMINI.md").exists());

    let config = std::fs::read_to_string(root.join(".technocrat/config.yaml")).unwrap();
    assert!(config.contains("claude"));
    assert!(config.contains("gemini"));
}

#[test]
fn init_is_idempotent_and_keeps_constitution() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    technocrat(&root).arg("init").assert().success();
    std::fs::write(root.join("memory/constitution.md"), "# Ours\n").unwrap();

    technocrat(&root)
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  memory/constitution.md"));
    assert_eq!(
        std::fs::read_to_string(root.join("memory/constitution.md")).unwrap(),
        "# Ours\n"
    );
}

#[test]
fn init_rejects_unknown_agent() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    technocrat(&root)
        .args(["init", "--agent", "vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown agent 'vim'"));
    assert!(!root.join("memory").exists());
}

// ---------------------------------------------------------------------------
// technocrat feature
// ---------------------------------------------------------------------------

#[test]
fn feature_create_numbers_sequentially() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    technocrat(&root).arg("init").assert().success();

    let first = stdout_json(technocrat(&root).args([
        "--json",
        "feature",
        "create",
        "Add user authentication with magic links",
        "--no-branch",
    ]));
    let branch = first["branch"].as_str().unwrap();
    assert!(branch.starts_with("001-"), "{branch}");
    assert!(branch.contains("authentication"));
    assert_eq!(first["git_branch"], false);
    let spec = std::fs::read_to_string(root.join("specs").join(branch).join("spec.md")).unwrap();
    assert!(spec.contains("Add user authentication with magic links"));

    let second = stdout_json(technocrat(&root).args([
        "--json",
        "feature",
        "create",
        "Shopping cart",
        "--short-name",
        "cart",
        "--no-branch",
    ]));
    assert_eq!(second["branch"], "002-cart");
    assert_eq!(second["number"], 2);
}

#[test]
fn feature_list_reports_documents() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    technocrat(&root).arg("init").assert().success();
    std::fs::create_dir_all(root.join("specs/001-login")).unwrap();
    std::fs::write(root.join("specs/001-login/spec.md"), "# Login").unwrap();

    let listing = stdout_json(technocrat(&root).args(["feature", "list", "--json"]));
    assert_eq!(listing[0]["name"], "001-login");
    assert_eq!(listing[0]["has_spec"], true);
    assert_eq!(listing[0]["has_plan"], false);

    technocrat(&root)
        .args(["feature", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("001-login"));
}

#[test]
fn feature_current_detects_feature_dir() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    technocrat(&root).arg("init").assert().success();
    let feature = root.join("specs/001-login");
    std::fs::create_dir_all(&feature).unwrap();

    let ctx = stdout_json(technocrat(&feature).args(["feature", "current", "--json"]));
    assert_eq!(ctx["feature_name"], "001-login");
    assert_eq!(ctx["project_name"], "acme");
}

// ---------------------------------------------------------------------------
// technocrat prompt
// ---------------------------------------------------------------------------

#[test]
fn prompt_renders_command_with_input() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    technocrat(&root)
        .args(["prompt", "spec", "--input", "Photo albums"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Spec\n\n## User Input\n\nPhoto albums"))
        .stdout(predicate::str::contains("Feature description: Photo albums"));
}

#[test]
fn prompt_sees_feature_documents() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    technocrat(&root).arg("init").assert().success();
    let feature = root.join("specs/001-login");
    std::fs::create_dir_all(&feature).unwrap();
    std::fs::write(feature.join("spec.md"), "Users log in with a magic link.").unwrap();

    technocrat(&feature)
        .args(["prompt", "plan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan the implementation of **001-login** in acme"))
        .stdout(predicate::str::contains("Users log in with a magic link."));
}

#[test]
fn prompt_unknown_command_fails() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    technocrat(&root)
        .args(["prompt", "deploy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown command template: deploy"));
}

// ---------------------------------------------------------------------------
// technocrat context
// ---------------------------------------------------------------------------

#[test]
fn context_update_requires_agents() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    technocrat(&root).arg("init").assert().success();
    technocrat(&root)
        .args(["context", "update"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no agents selected"));
}

#[test]
fn context_update_replaces_section_in_place() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    technocrat(&root).arg("init").assert().success();
    std::fs::write(root.join("AGENTS.md"), "# Notes\n\nKeep me.\n").unwrap();
    std::fs::create_dir_all(root.join("specs/001-api")).unwrap();
    std::fs::write(
        root.join("specs/001-api/plan.md"),
        "**Language/Version**: Rust 1.80\n**Storage**: SQLite\n",
    )
    .unwrap();

    for _ in 0..2 {
        technocrat(&root)
            .args(["context", "update", "--agent", "codex"])
            .assert()
            .success();
    }

    let agents_md = std::fs::read_to_string(root.join("AGENTS.md")).unwrap();
    assert!(agents_md.starts_with("# Notes\n\nKeep me.\n"));
    assert_eq!(agents_md.matches("<!-- technocrat:start -->").count(), 1);
    assert!(agents_md.contains("Rust 1.80"));
}

// ---------------------------------------------------------------------------
// technocrat check / mcp
// ---------------------------------------------------------------------------

#[test]
fn check_reports_git_first() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    let report = stdout_json(technocrat(&root).args(["check", "--json"]));
    assert_eq!(report[0]["tool"], "git");
    assert!(report[0]["found"].is_boolean());
}

#[test]
fn mcp_answers_over_stdio() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"prompts/list"}"#,
        "\n",
    );
    let output = technocrat(&root).arg("mcp").write_stdin(input).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[0]["result"]["serverInfo"]["name"], "technocrat");
    assert_eq!(lines[1]["result"]["prompts"].as_array().unwrap().len(), 7);
}
