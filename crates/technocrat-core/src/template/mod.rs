//! Go-style text templates for workflow prompts.
//!
//! Parsing and rendering are delegated to `gtmpl`, which implements Go's
//! `text/template`. This module supplies the data model, the function
//! library and a classification of gtmpl's failures into [`TemplateError`]
//! with a category and a remediation hint.

mod error;
mod funcs;

pub use error::{ExecErrorKind, ParseErrorKind, TemplateError};
pub use funcs::{title_case, FuncMap};

use crate::workspace::WorkspaceContext;
use chrono::{DateTime, Utc};
use gtmpl::Context;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Placeholder written by older command documents.
pub const LEGACY_ARGUMENTS_TOKEN: &str = "$ARGUMENTS";
pub const ARGUMENTS_PLACEHOLDER: &str = "{{.Arguments}}";

/// Fields of [`TemplateData`] as templates see them.
pub const TEMPLATE_VARIABLES: [&str; 8] = [
    ".Arguments",
    ".Branch",
    ".CommandName",
    ".Extra",
    ".FeatureName",
    ".ProjectName",
    ".Timestamp",
    ".WorkspaceRoot",
];

const DEFAULT_TEMPLATE_NAME: &str = "template";

// ---------------------------------------------------------------------------
// TemplateData
// ---------------------------------------------------------------------------

/// Substitution context for one render pass. Every string may be empty;
/// templates treat emptiness as "no value".
#[derive(Debug, Clone)]
pub struct TemplateData {
    pub arguments: String,
    pub command_name: String,
    pub timestamp: DateTime<Utc>,
    pub project_name: String,
    pub feature_name: String,
    pub workspace_root: String,
    pub branch: String,
    pub extra: BTreeMap<String, Value>,
}

impl TemplateData {
    pub fn new(command_name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            arguments: arguments.into(),
            command_name: command_name.into(),
            timestamp: Utc::now(),
            project_name: String::new(),
            feature_name: String::new(),
            workspace_root: String::new(),
            branch: String::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_workspace(mut self, ctx: &WorkspaceContext) -> Self {
        self.project_name = ctx.project_name.clone();
        self.feature_name = ctx.feature_name.clone();
        self.workspace_root = ctx
            .root
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.branch = ctx.branch.clone();
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// The value tree templates are evaluated against.
    pub fn to_value(&self) -> Value {
        json!({
            "Arguments": self.arguments,
            "CommandName": self.command_name,
            "Timestamp": self.timestamp.to_rfc3339(),
            "ProjectName": self.project_name,
            "FeatureName": self.feature_name,
            "WorkspaceRoot": self.workspace_root,
            "Branch": self.branch,
            "Extra": self.extra,
        })
    }

    fn template_name(&self) -> &str {
        if self.command_name.is_empty() {
            DEFAULT_TEMPLATE_NAME
        } else {
            &self.command_name
        }
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// A parsed template bound to the function set it was parsed against.
pub struct Template {
    name: String,
    inner: gtmpl::Template,
    feature_dir: Option<PathBuf>,
}

impl Template {
    pub fn parse(name: &str, source: &str, funcs: FuncMap) -> Result<Self, TemplateError> {
        let mut inner = gtmpl::Template::default();
        funcs.register(&mut inner);
        inner
            .parse(source)
            .map_err(|e| error::classify_parse(name, e.to_string(), &funcs.names()))?;

        Ok(Self {
            name: name.to_string(),
            inner,
            feature_dir: funcs.feature_dir().cloned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn execute(&self, data: &TemplateData) -> Result<String, TemplateError> {
        self.execute_value(&data.to_value())
    }

    pub fn execute_value(&self, data: &Value) -> Result<String, TemplateError> {
        let _bound = funcs::bind_feature_dir(self.feature_dir.clone());
        self.inner
            .render(&Context::from(to_gtmpl(data, true)))
            .map_err(|e| error::classify_exec(&self.name, e.to_string(), &TEMPLATE_VARIABLES))
    }
}

/// Convert render data into gtmpl's value model. The top-level object
/// becomes a strict `Object` so misspelt fields fail; nested objects become
/// lenient `Map`s, so a missing `.Extra.key` is not an error.
fn to_gtmpl(value: &Value, top: bool) -> gtmpl::Value {
    match value {
        Value::Null => gtmpl::Value::Nil,
        Value::Bool(b) => gtmpl::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                gtmpl::Value::from(i)
            } else if let Some(u) = n.as_u64() {
                gtmpl::Value::from(u)
            } else {
                gtmpl::Value::from(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => gtmpl::Value::String(s.clone()),
        Value::Array(items) => {
            gtmpl::Value::Array(items.iter().map(|v| to_gtmpl(v, false)).collect())
        }
        Value::Object(map) => {
            let fields: HashMap<String, gtmpl::Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), to_gtmpl(v, false)))
                .collect();
            if top {
                gtmpl::Value::Object(fields)
            } else {
                gtmpl::Value::Map(fields)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Processing entry points
// ---------------------------------------------------------------------------

/// Rewrite legacy `$ARGUMENTS` tokens to `{{.Arguments}}`.
///
/// Purely textual and idempotent: the replacement contains no `$ARGUMENTS`,
/// so a second pass finds nothing to change.
pub fn prepare_template_content(content: &str) -> String {
    content.replace(LEGACY_ARGUMENTS_TOKEN, ARGUMENTS_PLACEHOLDER)
}

/// Render `body` with the builtin function set.
pub fn process_template(body: &str, data: &TemplateData) -> Result<String, TemplateError> {
    render(body, data, FuncMap::builtin())
}

/// Render `body` with the builtin functions plus the feature-document
/// readers bound to `data.workspace_root` and `data.feature_name`.
pub fn process_template_with_context(
    body: &str,
    data: &TemplateData,
) -> Result<String, TemplateError> {
    let funcs = FuncMap::with_feature_readers(&data.workspace_root, &data.feature_name);
    render(body, data, funcs)
}

/// Parse `body` against the context-aware function set without rendering.
pub fn validate_template(name: &str, body: &str) -> Result<(), TemplateError> {
    let funcs = FuncMap::with_feature_readers("", "");
    Template::parse(name, &prepare_template_content(body), funcs).map(|_| ())
}

fn render(body: &str, data: &TemplateData, funcs: FuncMap) -> Result<String, TemplateError> {
    let prepared = prepare_template_content(body);
    Template::parse(data.template_name(), &prepared, funcs)?.execute(data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
