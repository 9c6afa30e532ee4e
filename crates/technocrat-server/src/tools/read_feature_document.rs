use super::{require_root, McpTool};
use technocrat_core::feature::Feature;
use technocrat_core::workspace::WorkspaceContext;

pub struct ReadFeatureDocumentTool;

impl McpTool for ReadFeatureDocumentTool {
    fn name(&self) -> &str {
        "read_feature_document"
    }

    fn description(&self) -> &str {
        "Read a document (spec.md, plan.md, tasks.md or any sibling file) from a feature directory"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "feature": {
                    "type": "string",
                    "description": "Feature directory name; defaults to the current feature"
                },
                "document": {
                    "type": "string",
                    "description": "File name inside the feature directory, e.g. plan.md"
                }
            },
            "required": ["document"]
        })
    }

    fn call(
        &self,
        args: serde_json::Value,
        ctx: &WorkspaceContext,
    ) -> Result<serde_json::Value, String> {
        let document = args["document"]
            .as_str()
            .ok_or_else(|| "missing required argument: document".to_string())?;
        let feature = match args["feature"].as_str() {
            Some(f) if !f.is_empty() => f,
            _ if !ctx.feature_name.is_empty() => ctx.feature_name.as_str(),
            _ => return Err("missing argument: feature (no current feature detected)".into()),
        };
        let root = require_root(ctx)?;

        let content = Feature::read_document(root, feature, document).map_err(|e| e.to_string())?;
        Ok(serde_json::json!({
            "feature": feature,
            "document": document,
            "content": content,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, WorkspaceContext) {
        let dir = TempDir::new().unwrap();
        let feature = dir.path().join("specs/001-auth");
        std::fs::create_dir_all(&feature).unwrap();
        std::fs::write(feature.join("plan.md"), "the plan").unwrap();
        let ctx = WorkspaceContext {
            root: Some(dir.path().to_path_buf()),
            feature_name: "001-auth".into(),
            ..WorkspaceContext::default()
        };
        (dir, ctx)
    }

    #[test]
    fn reads_named_feature_document() {
        let (_dir, ctx) = setup();
        let v = ReadFeatureDocumentTool
            .call(
                serde_json::json!({"feature": "001-auth", "document": "plan.md"}),
                &ctx,
            )
            .unwrap();
        assert_eq!(v["content"], "the plan");
    }

    #[test]
    fn defaults_to_current_feature() {
        let (_dir, ctx) = setup();
        let v = ReadFeatureDocumentTool
            .call(serde_json::json!({"document": "plan.md"}), &ctx)
            .unwrap();
        assert_eq!(v["feature"], "001-auth");
    }

    #[test]
    fn rejects_traversal_and_missing_args() {
        let (_dir, ctx) = setup();
        let err = ReadFeatureDocumentTool
            .call(serde_json::json!({"document": "../../secret"}), &ctx)
            .unwrap_err();
        assert!(err.contains("invalid document name"));

        let err = ReadFeatureDocumentTool
            .call(serde_json::json!({"feature": "001-auth"}), &ctx)
            .unwrap_err();
        assert!(err.contains("document"));
    }
}
