use technocrat_core::workspace::WorkspaceContext;

pub mod get_workspace_context;
pub mod list_features;
pub mod read_feature_document;

/// A callable MCP tool. Handlers see a freshly detected workspace context
/// on every call. Errors are reported to the client as tool output with
/// `isError` set, not as protocol errors.
pub trait McpTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> serde_json::Value;
    fn call(
        &self,
        args: serde_json::Value,
        ctx: &WorkspaceContext,
    ) -> Result<serde_json::Value, String>;
}

pub fn all_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(get_workspace_context::GetWorkspaceContextTool),
        Box::new(list_features::ListFeaturesTool),
        Box::new(read_feature_document::ReadFeatureDocumentTool),
    ]
}

/// The workspace root, or the error every root-bound tool reports.
pub(crate) fn require_root(ctx: &WorkspaceContext) -> Result<&std::path::Path, String> {
    ctx.root
        .as_deref()
        .ok_or_else(|| technocrat_core::TechnocratError::NotInitialized.to_string())
}
