//! Templates compiled into the binary.

use crate::error::{Result, TechnocratError};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "$CARGO_MANIFEST_DIR/templates/"]
struct Assets;

const COMMANDS_PREFIX: &str = "commands/";
const DOCS_PREFIX: &str = "docs/";

/// Document template names (`spec-template.md`, ...) installed by `init`
/// under `templates/`.
pub const DOCUMENT_TEMPLATES: [&str; 3] =
    ["spec-template.md", "plan-template.md", "tasks-template.md"];

pub const CONSTITUTION_TEMPLATE: &str = "constitution.md";
pub const AGENT_FILE_TEMPLATE: &str = "agent-file-template.md";

fn get(path: &str) -> Result<String> {
    let file = <Assets as Embed>::get(path)
        .ok_or_else(|| TechnocratError::AssetMissing(path.to_string()))?;
    Ok(String::from_utf8_lossy(&file.data).into_owned())
}

/// Raw markdown of an embedded command document.
pub fn command(name: &str) -> Result<String> {
    get(&format!("{COMMANDS_PREFIX}{name}.md"))
        .map_err(|_| TechnocratError::CommandNotFound(name.to_string()))
}

/// Names of every embedded command, sorted.
pub fn command_names() -> Vec<String> {
    let mut names: Vec<String> = Assets::iter()
        .filter_map(|path| {
            path.strip_prefix(COMMANDS_PREFIX)
                .and_then(|rest| rest.strip_suffix(".md"))
                .map(str::to_string)
        })
        .collect();
    names.sort();
    names
}

/// An embedded document template by file name (`plan-template.md`).
pub fn document(name: &str) -> Result<String> {
    get(&format!("{DOCS_PREFIX}{name}"))
}

/// File names of every embedded document template, sorted.
pub fn document_names() -> Vec<String> {
    let mut names: Vec<String> = Assets::iter()
        .filter_map(|path| path.strip_prefix(DOCS_PREFIX).map(str::to_string))
        .collect();
    names.sort();
    names
}
