pub mod check;
pub mod context;
pub mod feature;
pub mod init;
pub mod mcp;
pub mod prompt;
pub mod serve;

use anyhow::Context as _;
use technocrat_core::agents::Agent;

/// Parse `--agent` values, failing on the first unknown name.
pub fn parse_agents(names: &[String]) -> anyhow::Result<Vec<Agent>> {
    names
        .iter()
        .map(|n| Agent::from_name(n).with_context(|| format!("invalid --agent '{n}'")))
        .collect()
}
