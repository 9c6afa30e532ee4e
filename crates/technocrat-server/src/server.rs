use crate::error::McpError;
use crate::prompts::{self, CommandPrompt, PromptInfo, PromptResult};
use crate::resources::{self, Resource, ResourceContents, ResourceInfo};
use crate::tools::{self, McpTool};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use technocrat_core::commands::{self, CommandDocument};
use technocrat_core::workspace::{self, WorkspaceContext};

#[derive(Debug, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ToolContent {
    pub r#type: &'static str,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

/// Tool, prompt and resource registries. Built once before serving and
/// read-only afterwards, so it is shared behind an `Arc` without locks.
pub struct McpServer {
    start_dir: PathBuf,
    tools: HashMap<String, Box<dyn McpTool>>,
    prompts: HashMap<String, CommandPrompt>,
    resources: HashMap<String, Resource>,
}

impl McpServer {
    /// Registries for the embedded commands. Workspace context is detected
    /// from `start_dir` on every request.
    pub fn new(start_dir: impl Into<PathBuf>) -> technocrat_core::Result<Self> {
        Ok(Self::with_commands(start_dir, commands::all()?))
    }

    pub fn with_commands(
        start_dir: impl Into<PathBuf>,
        commands: impl IntoIterator<Item = CommandDocument>,
    ) -> Self {
        let tools = tools::all_tools()
            .into_iter()
            .map(|t| (t.name().to_string(), t))
            .collect();
        let server = Self {
            start_dir: start_dir.into(),
            tools,
            prompts: prompts::register_command_prompts(commands),
            resources: resources::register_resources(),
        };
        tracing::info!(
            tools = server.tools.len(),
            prompts = server.prompts.len(),
            resources = server.resources.len(),
            "mcp registries ready"
        );
        server
    }

    pub fn start_dir(&self) -> &Path {
        &self.start_dir
    }

    pub fn context(&self) -> WorkspaceContext {
        workspace::detect_from(&self.start_dir)
    }

    // -----------------------------------------------------------------------
    // Tools
    // -----------------------------------------------------------------------

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        let mut list: Vec<ToolInfo> = self
            .tools
            .values()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.schema(),
            })
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    pub fn call_tool(&self, name: &str, args: serde_json::Value) -> Result<ToolCallResult, McpError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| McpError::not_found("tool", name))?;

        let (text, is_error) = match tool.call(args, &self.context()) {
            Ok(v) => (
                serde_json::to_string_pretty(&v)
                    .unwrap_or_else(|e| format!("serialization error: {e}")),
                false,
            ),
            Err(e) => {
                tracing::debug!(tool = name, error = %e, "tool call failed");
                (e, true)
            }
        };
        Ok(ToolCallResult {
            content: vec![ToolContent {
                r#type: "text",
                text,
            }],
            is_error,
        })
    }

    // -----------------------------------------------------------------------
    // Prompts
    // -----------------------------------------------------------------------

    pub fn list_prompts(&self) -> Vec<PromptInfo> {
        let mut list: Vec<PromptInfo> = self.prompts.values().map(CommandPrompt::info).collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    pub fn get_prompt(&self, name: &str, user_input: &str) -> Result<PromptResult, McpError> {
        let prompt = self
            .prompts
            .get(name)
            .ok_or_else(|| McpError::not_found("prompt", name))?;
        prompt.get(user_input, &self.context())
    }

    // -----------------------------------------------------------------------
    // Resources
    // -----------------------------------------------------------------------

    pub fn list_resources(&self) -> Vec<ResourceInfo> {
        let mut list: Vec<ResourceInfo> =
            self.resources.values().map(|r| r.info().clone()).collect();
        list.sort_by(|a, b| a.uri.cmp(&b.uri));
        list
    }

    pub fn read_resource(&self, uri: &str) -> Result<ResourceContents, McpError> {
        let resource = self
            .resources
            .get(uri)
            .ok_or_else(|| McpError::not_found("resource", uri))?;
        resource.read(&self.context())
    }
}
