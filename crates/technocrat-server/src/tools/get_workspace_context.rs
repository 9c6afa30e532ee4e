use super::McpTool;
use technocrat_core::workspace::WorkspaceContext;

pub struct GetWorkspaceContextTool;

impl McpTool for GetWorkspaceContextTool {
    fn name(&self) -> &str {
        "get_workspace_context"
    }

    fn description(&self) -> &str {
        "Get the detected workspace root, project name, current feature and git branch"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    fn call(
        &self,
        _args: serde_json::Value,
        ctx: &WorkspaceContext,
    ) -> Result<serde_json::Value, String> {
        serde_json::to_value(ctx).map_err(|e| e.to_string())
    }
}
