use crate::template::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TechnocratError {
    #[error("not a technocrat workspace: run 'technocrat init'")]
    NotInitialized,

    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    #[error("feature already exists: {0}")]
    FeatureExists(String),

    #[error("invalid feature description '{0}': no usable words for a branch name")]
    InvalidFeatureName(String),

    #[error("invalid document name '{0}': must be a plain file name")]
    InvalidDocumentName(String),

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("unknown command template: {0}")]
    CommandNotFound(String),

    #[error("unknown agent '{0}' (expected one of: {1})")]
    UnknownAgent(String, String),

    #[error("embedded asset missing: {0}")]
    AssetMissing(String),

    #[error("git failed: {0}")]
    Git(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TechnocratError>;
