use crate::output::{print_json, print_table};
use crate::root::workspace_root;
use serde::Serialize;
use std::path::{Path, PathBuf};
use technocrat_core::{agents::Agent, config::Config};

#[derive(Debug, Serialize)]
struct ToolStatus {
    tool: String,
    binary: &'static str,
    found: bool,
    path: Option<PathBuf>,
    /// The agent is selected in the workspace config.
    selected: bool,
}

pub fn run(start: &Path, json: bool) -> anyhow::Result<()> {
    let root = workspace_root(start);
    let selected = Config::load(&root)?.selected_agents();

    let mut statuses = vec![tool_status("git", "git", true)];
    for agent in Agent::ALL {
        if let Some(binary) = agent.cli_binary() {
            statuses.push(tool_status(agent.name(), binary, selected.contains(&agent)));
        }
    }

    for s in statuses.iter().filter(|s| s.selected && !s.found) {
        tracing::warn!(tool = %s.tool, binary = s.binary, "selected tool not found on PATH");
    }

    if json {
        return print_json(&statuses);
    }

    let rows: Vec<Vec<String>> = statuses
        .iter()
        .map(|s| {
            vec![
                s.tool.clone(),
                (if s.found { "found" } else { "missing" }).to_string(),
                s.path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["TOOL", "STATUS", "PATH"], &rows);
    Ok(())
}

fn tool_status(tool: &str, binary: &'static str, selected: bool) -> ToolStatus {
    let path = which::which(binary).ok();
    ToolStatus {
        tool: tool.to_string(),
        binary,
        found: path.is_some(),
        path,
        selected,
    }
}
