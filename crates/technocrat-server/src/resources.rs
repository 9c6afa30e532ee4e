use crate::error::McpError;
use serde::Serialize;
use std::collections::HashMap;
use technocrat_core::workspace::WorkspaceContext;
use technocrat_core::{assets, io, paths};

pub const CONSTITUTION_URI: &str = "technocrat://memory/constitution";
const TEMPLATE_URI_PREFIX: &str = "technocrat://templates/";

#[derive(Debug, Clone)]
enum Source {
    Constitution,
    Embedded(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceInfo {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceContents {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Resource {
    info: ResourceInfo,
    source: Source,
}

impl Resource {
    pub fn info(&self) -> &ResourceInfo {
        &self.info
    }

    pub fn read(&self, ctx: &WorkspaceContext) -> Result<ResourceContents, McpError> {
        let text = match &self.source {
            Source::Constitution => ctx
                .root
                .as_deref()
                .and_then(|root| io::read_optional(&paths::constitution_path(root)))
                .ok_or_else(|| McpError::not_found("resource", &self.info.uri))?,
            Source::Embedded(name) => assets::document(name)?,
        };
        Ok(ResourceContents {
            uri: self.info.uri.clone(),
            mime_type: self.info.mime_type.clone(),
            text,
        })
    }
}

/// The project constitution plus every embedded document template.
pub fn register_resources() -> HashMap<String, Resource> {
    let mut resources = HashMap::new();
    resources.insert(
        CONSTITUTION_URI.to_string(),
        Resource {
            info: ResourceInfo {
                uri: CONSTITUTION_URI.to_string(),
                name: "constitution".to_string(),
                description: "Project constitution from memory/constitution.md".to_string(),
                mime_type: "text/markdown".to_string(),
            },
            source: Source::Constitution,
        },
    );
    for name in assets::document_names() {
        let uri = format!("{TEMPLATE_URI_PREFIX}{name}");
        let mime = mime_guess::from_path(&name).first_or_text_plain();
        resources.insert(
            uri.clone(),
            Resource {
                info: ResourceInfo {
                    uri,
                    name: name.clone(),
                    description: format!("Embedded document template {name}"),
                    mime_type: mime.essence_str().to_string(),
                },
                source: Source::Embedded(name),
            },
        );
    }
    resources
}
