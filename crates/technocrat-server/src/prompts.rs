//! Workflow commands exposed as MCP prompts.

use crate::error::McpError;
use serde::Serialize;
use std::collections::HashMap;
use technocrat_core::commands::CommandDocument;
use technocrat_core::prompt::build_prompt_message;
use technocrat_core::template::validate_template;
use technocrat_core::workspace::WorkspaceContext;

pub const USER_INPUT_ARG: &str = "user_input";
const USER_INPUT_DESCRIPTION: &str = "Optional user input to guide the workflow";

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptInfo {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptResult {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}

/// A registered workflow prompt. The body has already parsed once.
#[derive(Debug, Clone)]
pub struct CommandPrompt {
    command: CommandDocument,
}

impl CommandPrompt {
    pub fn info(&self) -> PromptInfo {
        PromptInfo {
            name: self.command.name.clone(),
            description: self.command.description.clone(),
            arguments: vec![PromptArgument {
                name: USER_INPUT_ARG,
                description: USER_INPUT_DESCRIPTION,
                required: false,
            }],
        }
    }

    pub fn get(&self, user_input: &str, ctx: &WorkspaceContext) -> Result<PromptResult, McpError> {
        let content =
            build_prompt_message(&self.command.name, &self.command.body, user_input, ctx)?;
        Ok(PromptResult {
            description: self.command.description.clone(),
            messages: vec![PromptMessage {
                role: "user",
                content,
            }],
        })
    }
}

/// Register every command whose body parses. A command that fails to parse
/// is logged and left out; the others are still served.
pub fn register_command_prompts(
    commands: impl IntoIterator<Item = CommandDocument>,
) -> HashMap<String, CommandPrompt> {
    let mut prompts = HashMap::new();
    for command in commands {
        if let Err(e) = validate_template(&command.name, &command.body) {
            tracing::warn!(command = %command.name, error = %e, "skipping command prompt");
            continue;
        }
        tracing::debug!(command = %command.name, "registered prompt");
        prompts.insert(command.name.clone(), CommandPrompt { command });
    }
    prompts
}

/// The `user_input` argument from a `prompts/get` arguments object.
pub fn user_input_arg(arguments: Option<&serde_json::Value>) -> Result<String, McpError> {
    match arguments.and_then(|a| a.get(USER_INPUT_ARG)) {
        None | Some(serde_json::Value::Null) => Ok(String::new()),
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(McpError::invalid_params(format!(
            "argument '{USER_INPUT_ARG}' must be a string"
        ))),
    }
}
