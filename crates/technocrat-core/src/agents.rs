//! AI coding agents: where their command files and context files live and
//! how both are written.

use crate::commands::CommandDocument;
use crate::error::{Result, TechnocratError};
use crate::feature::Feature;
use crate::template::{FuncMap, Template, TemplateData};
use crate::workspace::WorkspaceContext;
use crate::{assets, io, paths};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const CONTEXT_START_MARKER: &str = "<!-- technocrat:start -->";
pub const CONTEXT_END_MARKER: &str = "<!-- technocrat:end -->";

const COMMAND_FILE_PREFIX: &str = "technocrat.";

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Agent {
    Claude,
    Gemini,
    Copilot,
    Cursor,
    Opencode,
    Codex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFormat {
    Markdown,
    Toml,
}

impl Agent {
    pub const ALL: [Agent; 6] = [
        Agent::Claude,
        Agent::Gemini,
        Agent::Copilot,
        Agent::Cursor,
        Agent::Opencode,
        Agent::Codex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Agent::Claude => "claude",
            Agent::Gemini => "gemini",
            Agent::Copilot => "copilot",
            Agent::Cursor => "cursor",
            Agent::Opencode => "opencode",
            Agent::Codex => "codex",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|a| a.name()).collect();
                TechnocratError::UnknownAgent(name.to_string(), known.join(", "))
            })
    }

    /// Context file relative to the workspace root.
    pub fn context_file(self) -> &'static str {
        match self {
            Agent::Claude => "CLAUDE.md",
            Agent::Gemini => "GEMINI.md",
            Agent::Copilot => ".github/copilot-instructions.md",
            Agent::Cursor | Agent::Opencode | Agent::Codex => "AGENTS.md",
        }
    }

    /// Directory holding command files, relative to the workspace root.
    pub fn commands_dir(self) -> &'static str {
        match self {
            Agent::Claude => ".claude/commands",
            Agent::Gemini => ".gemini/commands",
            Agent::Copilot => ".github/prompts",
            Agent::Cursor => ".cursor/commands",
            Agent::Opencode => ".opencode/command",
            Agent::Codex => ".codex/prompts",
        }
    }

    pub fn command_format(self) -> CommandFormat {
        match self {
            Agent::Gemini => CommandFormat::Toml,
            _ => CommandFormat::Markdown,
        }
    }

    /// Placeholder the agent substitutes with the user's arguments.
    pub fn args_placeholder(self) -> &'static str {
        match self {
            Agent::Gemini => "{{args}}",
            _ => "$ARGUMENTS",
        }
    }

    /// CLI binary `technocrat check` looks for. Copilot lives inside the IDE.
    pub fn cli_binary(self) -> Option<&'static str> {
        match self {
            Agent::Claude => Some("claude"),
            Agent::Gemini => Some("gemini"),
            Agent::Copilot => None,
            Agent::Cursor => Some("cursor-agent"),
            Agent::Opencode => Some("opencode"),
            Agent::Codex => Some("codex"),
        }
    }

    pub fn command_file_name(self, command: &str) -> String {
        match self {
            Agent::Gemini => format!("{COMMAND_FILE_PREFIX}{command}.toml"),
            Agent::Copilot => format!("{COMMAND_FILE_PREFIX}{command}.prompt.md"),
            _ => format!("{COMMAND_FILE_PREFIX}{command}.md"),
        }
    }

    /// Content of the agent-native command file for `command`. The file
    /// delegates to `technocrat prompt` so the workflow is rendered against
    /// the live workspace when the agent runs it.
    pub fn render_command_file(self, command: &CommandDocument) -> String {
        let instructions = format!(
            "Run the following from the repository root and follow the instructions it prints:\n\n\
             ```sh\ntechnocrat prompt {} --input \"{}\"\n```\n",
            command.name,
            self.args_placeholder()
        );
        match self.command_format() {
            CommandFormat::Markdown => format!(
                "---\ndescription: \"{}\"\n---\n\n{instructions}",
                escape_double_quotes(&command.description)
            ),
            CommandFormat::Toml => format!(
                "description = \"{}\"\n\nprompt = \"\"\"\n{instructions}\"\"\"\n",
                escape_double_quotes(&command.description)
            ),
        }
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn escape_double_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

// ---------------------------------------------------------------------------
// Command files
// ---------------------------------------------------------------------------

/// Write one command file per embedded command for `agent`. Existing files
/// are kept unless `force` is set. Returns the paths written.
pub fn install_command_files(root: &Path, agent: Agent, force: bool) -> Result<Vec<PathBuf>> {
    let dir = root.join(agent.commands_dir());
    io::ensure_dir(&dir)?;

    let mut written = Vec::new();
    for command in crate::commands::all()? {
        let path = dir.join(agent.command_file_name(&command.name));
        let content = agent.render_command_file(&command);
        let did_write = if force {
            io::atomic_write(&path, content.as_bytes())?;
            true
        } else {
            io::write_if_missing(&path, content.as_bytes())?
        };
        if did_write {
            written.push(path);
        }
    }
    tracing::debug!(agent = %agent, count = written.len(), "installed command files");
    Ok(written)
}

// ---------------------------------------------------------------------------
// Context files
// ---------------------------------------------------------------------------

/// Technical context fields read from a feature's `plan.md`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanTechnologies {
    pub language: Option<String>,
    pub dependencies: Option<String>,
    pub storage: Option<String>,
    pub project_type: Option<String>,
}

impl PlanTechnologies {
    /// Parse `**Label**: value` lines. Placeholder values (`[...]`,
    /// `NEEDS CLARIFICATION`, `N/A`) count as absent.
    pub fn parse(plan: &str) -> Self {
        let mut tech = Self::default();
        for line in plan.lines() {
            let Some((label, value)) = bold_field(line) else {
                continue;
            };
            let slot = match label {
                "Language/Version" => &mut tech.language,
                "Primary Dependencies" => &mut tech.dependencies,
                "Storage" => &mut tech.storage,
                "Project Type" => &mut tech.project_type,
                _ => continue,
            };
            if slot.is_none() && is_meaningful(value) {
                *slot = Some(value.to_string());
            }
        }
        tech
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// One line for the Active Technologies list.
    pub fn summary(&self, feature: &str) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let stack: Vec<&str> = [&self.language, &self.dependencies, &self.storage]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect();
        let mut line = if stack.is_empty() {
            String::from("unspecified stack")
        } else {
            stack.join(" + ")
        };
        if let Some(kind) = &self.project_type {
            line.push_str(&format!(" [{kind}]"));
        }
        line.push_str(&format!(" ({feature})"));
        Some(line)
    }
}

fn bold_field(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim().strip_prefix("**")?;
    let (label, value) = rest.split_once("**:")?;
    Some((label.trim(), value.trim()))
}

fn is_meaningful(value: &str) -> bool {
    !(value.is_empty()
        || value.starts_with('[')
        || value.contains("NEEDS CLARIFICATION")
        || value.eq_ignore_ascii_case("n/a"))
}

/// Technology lines from every feature that has a `plan.md`.
pub fn collect_technologies(root: &Path) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for feature in Feature::list(root)?.into_iter().filter(|f| f.has_plan) {
        let plan = paths::feature_document(root, &feature.name, paths::PLAN_MD);
        if let Some(summary) = io::read_optional(&plan)
            .map(|p| PlanTechnologies::parse(&p))
            .and_then(|t| t.summary(&feature.name))
        {
            lines.push(summary);
        }
    }
    Ok(lines)
}

/// Render the marker-delimited section written into context files.
pub fn render_context_section(ctx: &WorkspaceContext, technologies: &[String]) -> Result<String> {
    let source = assets::document(assets::AGENT_FILE_TEMPLATE)?;
    let template = Template::parse(assets::AGENT_FILE_TEMPLATE, &source, FuncMap::builtin())?;
    let data = TemplateData::new("context", "")
        .with_workspace(ctx)
        .with_extra("technologies", Value::from(technologies.to_vec()));
    let body = template.execute(&data)?;
    Ok(format!(
        "{CONTEXT_START_MARKER}\n{}\n{CONTEXT_END_MARKER}",
        body.trim_end()
    ))
}

/// Refresh the technocrat section of each agent's context file. Agents that
/// share a file are written once. Returns the files touched.
pub fn update_context_files(
    root: &Path,
    agents: &[Agent],
    ctx: &WorkspaceContext,
) -> Result<Vec<PathBuf>> {
    let technologies = collect_technologies(root)?;
    let section = render_context_section(ctx, &technologies)?;

    let mut touched: Vec<PathBuf> = Vec::new();
    for agent in agents {
        let path = root.join(agent.context_file());
        if touched.contains(&path) {
            continue;
        }
        write_context_section(&path, &section)?;
        tracing::info!(agent = %agent, path = %path.display(), "updated context file");
        touched.push(path);
    }
    Ok(touched)
}

fn write_context_section(path: &Path, section: &str) -> Result<()> {
    if io::replace_between_markers(path, CONTEXT_START_MARKER, CONTEXT_END_MARKER, section)? {
        return Ok(());
    }
    match io::read_optional(path) {
        Some(existing) => {
            let sep = if existing.ends_with('\n') { "\n" } else { "\n\n" };
            io::append_text(path, &format!("{sep}{section}\n"))
        }
        None => io::atomic_write(path, format!("{section}\n").as_bytes()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ctx(root: &Path, feature: &str) -> WorkspaceContext {
        WorkspaceContext {
            root: Some(root.to_path_buf()),
            project_name: "Acme".into(),
            feature_name: feature.into(),
            branch: String::new(),
        }
    }

    #[test]
    fn agent_names_round_trip() {
        for agent in Agent::ALL {
            assert_eq!(Agent::from_name(agent.name()).unwrap(), agent);
        }
        assert_eq!(Agent::from_name(" Claude ").unwrap(), Agent::Claude);
        let err = Agent::from_name("emacs").unwrap_err();
        assert!(err.to_string().contains("claude, gemini"));
    }

    #[test]
    fn command_file_names() {
        assert_eq!(Agent::Claude.command_file_name("plan"), "technocrat.plan.md");
        assert_eq!(Agent::Gemini.command_file_name("plan"), "technocrat.plan.toml");
        assert_eq!(
            Agent::Copilot.command_file_name("plan"),
            "technocrat.plan.prompt.md"
        );
    }

    #[test]
    fn markdown_and_toml_command_files() {
        let cmd = CommandDocument {
            name: "plan".into(),
            description: "Make a \"plan\"".into(),
            body: String::new(),
        };
        let md = Agent::Claude.render_command_file(&cmd);
        assert!(md.starts_with("---\ndescription: \"Make a \\\"plan\\\"\"\n---\n"));
        assert!(md.contains("technocrat prompt plan --input \"$ARGUMENTS\""));

        let toml = Agent::Gemini.render_command_file(&cmd);
        assert!(toml.starts_with("description = \"Make a \\\"plan\\\"\""));
        assert!(toml.contains("--input \"{{args}}\""));
        assert!(!toml.contains("$ARGUMENTS"));
    }

    #[test]
    fn install_respects_existing_files() {
        let dir = TempDir::new().unwrap();
        let written = install_command_files(dir.path(), Agent::Claude, false).unwrap();
        assert_eq!(written.len(), 7);

        let plan = dir.path().join(".claude/commands/technocrat.plan.md");
        std::fs::write(&plan, "custom").unwrap();
        assert!(install_command_files(dir.path(), Agent::Claude, false)
            .unwrap()
            .is_empty());
        assert_eq!(std::fs::read_to_string(&plan).unwrap(), "custom");

        install_command_files(dir.path(), Agent::Claude, true).unwrap();
        assert_ne!(std::fs::read_to_string(&plan).unwrap(), "custom");
    }

    #[test]
    fn plan_technology_parsing() {
        let plan = "\
**Language/Version**: Rust 1.80
**Primary Dependencies**: axum, sqlx
**Storage**: N/A
**Testing**: cargo test
**Project Type**: [single/web/mobile]
";
        let tech = PlanTechnologies::parse(plan);
        assert_eq!(tech.language.as_deref(), Some("Rust 1.80"));
        assert_eq!(tech.dependencies.as_deref(), Some("axum, sqlx"));
        assert_eq!(tech.storage, None);
        assert_eq!(tech.project_type, None);
        assert_eq!(
            tech.summary("001-auth").as_deref(),
            Some("Rust 1.80 + axum, sqlx (001-auth)")
        );
    }

    #[test]
    fn template_plan_has_no_technologies() {
        let plan = assets::document("plan-template.md").unwrap();
        assert!(PlanTechnologies::parse(&plan).is_empty());
    }

    #[test]
    fn context_file_created_then_refreshed_in_place() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let feature = paths::feature_dir(root, "001-auth");
        std::fs::create_dir_all(&feature).unwrap();
        std::fs::write(
            feature.join("plan.md"),
            "**Language/Version**: Go 1.22\n**Project Type**: web\n",
        )
        .unwrap();

        let touched =
            update_context_files(root, &[Agent::Cursor, Agent::Codex], &ctx(root, "001-auth"))
                .unwrap();
        assert_eq!(touched, vec![root.join("AGENTS.md")]);

        let first = std::fs::read_to_string(root.join("AGENTS.md")).unwrap();
        assert!(first.starts_with(CONTEXT_START_MARKER));
        assert!(first.contains("# Acme Development Guidelines"));
        assert!(first.contains("- Go 1.22 [web] (001-auth)"));
        assert!(first.contains("`specs/001-auth/`"));

        let with_notes = format!("# My notes\n\n{first}\nKeep this.\n");
        std::fs::write(root.join("AGENTS.md"), &with_notes).unwrap();
        update_context_files(root, &[Agent::Cursor], &ctx(root, "")).unwrap();

        let second = std::fs::read_to_string(root.join("AGENTS.md")).unwrap();
        assert!(second.starts_with("# My notes\n\n"));
        assert!(second.ends_with("Keep this.\n"));
        assert!(!second.contains("Current Feature"));
        assert_eq!(second.matches(CONTEXT_START_MARKER).count(), 1);
    }

    #[test]
    fn context_section_appended_to_foreign_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::write(root.join("CLAUDE.md"), "Existing rules").unwrap();

        update_context_files(root, &[Agent::Claude], &ctx(root, "")).unwrap();
        let content = std::fs::read_to_string(root.join("CLAUDE.md")).unwrap();
        assert!(content.starts_with("Existing rules\n\n<!-- technocrat:start -->"));
        assert!(content.contains("- (none recorded yet)"));
    }
}
