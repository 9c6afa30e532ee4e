use super::parse_agents;
use crate::output::print_json;
use crate::root::workspace_root;
use anyhow::{bail, Context as _};
use clap::Subcommand;
use std::path::Path;
use technocrat_core::{agents, config::Config, workspace};

#[derive(Subcommand)]
pub enum ContextSubcommand {
    /// Refresh the technocrat section of each agent context file
    Update {
        /// Agent whose context file to update (repeatable; default: agents from config)
        #[arg(long = "agent", value_name = "NAME")]
        agents: Vec<String>,
    },
}

pub fn run(start: &Path, subcmd: ContextSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ContextSubcommand::Update { agents } => update(start, &agents, json),
    }
}

fn update(start: &Path, agent_names: &[String], json: bool) -> anyhow::Result<()> {
    let root = workspace_root(start);
    let selected = if agent_names.is_empty() {
        Config::load(&root)
            .context("failed to load config.yaml")?
            .selected_agents()
    } else {
        parse_agents(agent_names)?
    };
    if selected.is_empty() {
        bail!("no agents selected: pass --agent <name> or run `technocrat init --agent <name>`");
    }

    let ctx = workspace::detect_from(start);
    let touched = agents::update_context_files(&root, &selected, &ctx)
        .context("failed to update agent context files")?;

    if json {
        return print_json(&touched);
    }
    for path in &touched {
        let shown = path.strip_prefix(&root).unwrap_or(path);
        println!("  updated: {}", shown.display());
    }
    Ok(())
}
