//! Workflow command documents: front matter plus a templated body.

use crate::assets;
use crate::error::Result;

const FRONT_MATTER_FENCE: &str = "---";

/// One workflow command as shipped in the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDocument {
    pub name: String,
    pub description: String,
    pub body: String,
}

impl CommandDocument {
    /// Load an embedded command by name.
    pub fn load(name: &str) -> Result<Self> {
        let raw = assets::command(name)?;
        let (description, body) = parse_command_document(&raw);
        Ok(Self {
            name: name.to_string(),
            description,
            body,
        })
    }
}

/// Every embedded command, sorted by name.
pub fn all() -> Result<Vec<CommandDocument>> {
    assets::command_names()
        .iter()
        .map(|name| CommandDocument::load(name))
        .collect()
}

/// Split a command document into `(description, body)`.
///
/// Front matter is only recognised when the very first line is `---`. An
/// opening fence without a closing one is treated as plain body text. The
/// body never starts with blank lines.
pub fn parse_command_document(content: &str) -> (String, String) {
    let lines: Vec<&str> = content.lines().collect();
    if lines.first().map(|l| l.trim_end()) != Some(FRONT_MATTER_FENCE) {
        return (String::new(), body_text(&lines));
    }
    let Some(close) = lines[1..]
        .iter()
        .position(|l| l.trim_end() == FRONT_MATTER_FENCE)
        .map(|i| i + 1)
    else {
        return (String::new(), body_text(&lines));
    };

    let description = lines[1..close]
        .iter()
        .find_map(|l| l.trim().strip_prefix("description:"))
        .map(|v| strip_quotes(v.trim()).to_string())
        .unwrap_or_default();

    (description, body_text(&lines[close + 1..]))
}

fn body_text(lines: &[&str]) -> String {
    lines
        .iter()
        .skip_while(|l| l.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner;
        }
    }
    s
}
