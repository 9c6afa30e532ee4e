use super::parse_agents;
use crate::output::print_json;
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};
use technocrat_core::{
    agents::{self, Agent},
    assets,
    config::Config,
    io, paths, workspace,
};

#[derive(Debug, Default, Serialize)]
struct InitReport {
    root: PathBuf,
    created: Vec<PathBuf>,
    existing: Vec<PathBuf>,
    agents: Vec<String>,
    command_files: Vec<PathBuf>,
    context_files: Vec<PathBuf>,
}

impl InitReport {
    fn record(&mut self, path: PathBuf, created: bool) {
        let rel = path
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or(path);
        if created {
            self.created.push(rel);
        } else {
            self.existing.push(rel);
        }
    }
}

pub fn run(root: &Path, agent_names: &[String], force: bool, json: bool) -> anyhow::Result<()> {
    let requested = parse_agents(agent_names)?;
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    let mut report = InitReport {
        root: root.to_path_buf(),
        ..InitReport::default()
    };

    // 1. Directories
    for dir in [
        paths::memory_dir(root),
        paths::specs_dir(root),
        paths::templates_dir(root),
    ] {
        io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    // 2. Constitution, never overwritten: it is the project's own document.
    let constitution = assets::document(assets::CONSTITUTION_TEMPLATE)?
        .replace("[PROJECT_NAME]", &project_name);
    let path = paths::constitution_path(root);
    let created = io::write_if_missing(&path, constitution.as_bytes())
        .context("failed to write constitution")?;
    report.record(path, created);

    // 3. Document templates
    for name in assets::DOCUMENT_TEMPLATES {
        let content = assets::document(name)?;
        let path = paths::templates_dir(root).join(name);
        let created = if force {
            io::atomic_write(&path, content.as_bytes())?;
            true
        } else {
            io::write_if_missing(&path, content.as_bytes())?
        };
        report.record(path, created);
    }

    // 4. Config: keep an existing one and merge the requested agents in.
    let config_path = paths::config_path(root);
    let existed = config_path.exists();
    let mut config = if existed {
        Config::load(root).context("failed to load config.yaml")?
    } else {
        Config::new(&project_name)
    };
    config.add_agents(&requested);
    config.technocrat_version = Some(env!("CARGO_PKG_VERSION").to_string());
    config.save(root).context("failed to write config.yaml")?;
    report.record(config_path, !existed);

    // 5. Agent scaffolding
    let selected: Vec<Agent> = config.selected_agents();
    for agent in &selected {
        let written = agents::install_command_files(root, *agent, force)
            .with_context(|| format!("failed to install {agent} command files"))?;
        report.command_files.extend(written);
    }
    if !selected.is_empty() {
        let ctx = workspace::detect_from(root);
        report.context_files = agents::update_context_files(root, &selected, &ctx)
            .context("failed to update agent context files")?;
    }
    report.agents = selected.iter().map(|a| a.name().to_string()).collect();

    if json {
        return print_json(&report);
    }

    println!("Initialized technocrat in: {}", root.display());
    for path in &report.created {
        println!("  created: {}", path.display());
    }
    for path in &report.existing {
        println!("  exists:  {}", path.display());
    }
    if report.agents.is_empty() {
        println!("No agents selected. Re-run with --agent <name> to install command files.");
    } else {
        println!(
            "Agents: {} ({} command files written, {} context files updated)",
            report.agents.join(", "),
            report.command_files.len(),
            report.context_files.len()
        );
    }
    println!("Next: technocrat feature create \"<what you want to build>\"");
    Ok(())
}
