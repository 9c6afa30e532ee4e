use std::path::Path;
use technocrat_core::{prompt, workspace};

/// Print the prompt the MCP server would return for `command`.
pub fn run(start: &Path, command: &str, input: &str) -> anyhow::Result<()> {
    let ctx = workspace::detect_from(start);
    let message = prompt::render_command(command, input, &ctx)?;
    println!("{message}");
    Ok(())
}
