use super::{require_root, McpTool};
use technocrat_core::feature::Feature;
use technocrat_core::workspace::WorkspaceContext;

pub struct ListFeaturesTool;

impl McpTool for ListFeaturesTool {
    fn name(&self) -> &str {
        "list_features"
    }

    fn description(&self) -> &str {
        "List feature directories under specs/ with which of spec.md, plan.md and tasks.md exist"
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
        let root = require_root(ctx)?;
        let features = Feature::list(root).map_err(|e| e.to_string())?;
        Ok(serde_json::json!({
            "current": ctx.feature_name,
            "features": features,
        }))
    }
}
