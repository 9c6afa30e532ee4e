//! Builds the user message served for a workflow command prompt.

use crate::commands::CommandDocument;
use crate::error::Result;
use crate::template::{self, title_case, TemplateData, TemplateError};
use crate::workspace::WorkspaceContext;

/// Assemble the user message for a workflow prompt.
///
/// The body is rendered with the feature-document readers bound to the
/// workspace in `ctx`. `user_input` is shown verbatim under its own heading
/// and also exposed to the body as `.Arguments`; the section is omitted when
/// the input is empty.
pub fn build_prompt_message(
    command_name: &str,
    workflow_body: &str,
    user_input: &str,
    ctx: &WorkspaceContext,
) -> std::result::Result<String, TemplateError> {
    let data = TemplateData::new(command_name, user_input).with_workspace(ctx);
    let rendered = template::process_template_with_context(workflow_body, &data)?;

    let mut message = format!("# {}\n\n", title_case(command_name));
    if !user_input.is_empty() {
        message.push_str("## User Input\n\n");
        message.push_str(user_input);
        message.push_str("\n\n");
    }
    message.push_str("## Workflow Instructions\n\n");
    message.push_str(&rendered);
    Ok(message)
}

/// Load an embedded command and build its prompt message.
pub fn render_command(name: &str, user_input: &str, ctx: &WorkspaceContext) -> Result<String> {
    let command = CommandDocument::load(name)?;
    let message = build_prompt_message(&command.name, &command.body, user_input, ctx)?;
    tracing::debug!(command = name, bytes = message.len(), "rendered prompt");
    Ok(message)
}
