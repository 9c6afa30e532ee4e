use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use technocrat_core::template::TemplateError;
use technocrat_core::TechnocratError;
use thiserror::Error;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// ---------------------------------------------------------------------------
// McpError
// ---------------------------------------------------------------------------

/// Failure of one MCP operation, shared by the JSON-RPC and HTTP surfaces.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("method not found: {0}")]
    MethodNotFound(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("{0}")]
    Internal(String),
}

impl McpError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// JSON-RPC error code. Template failures are internal errors carrying
    /// the hinted message.
    pub fn code(&self) -> i32 {
        match self {
            McpError::MethodNotFound(_) | McpError::NotFound { .. } => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::Template(_) | McpError::Internal(_) => INTERNAL_ERROR,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            McpError::MethodNotFound(_) | McpError::NotFound { .. } => StatusCode::NOT_FOUND,
            McpError::InvalidParams(_) | McpError::Template(_) => StatusCode::BAD_REQUEST,
            McpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TechnocratError> for McpError {
    fn from(err: TechnocratError) -> Self {
        match err {
            TechnocratError::Template(e) => McpError::Template(e),
            TechnocratError::CommandNotFound(name) => McpError::not_found("prompt", name),
            TechnocratError::FeatureNotFound(name) => McpError::not_found("feature", name),
            TechnocratError::DocumentNotFound(name) => McpError::not_found("document", name),
            TechnocratError::AssetMissing(name) => McpError::not_found("resource", name),
            e @ (TechnocratError::InvalidDocumentName(_)
            | TechnocratError::InvalidFeatureName(_)
            | TechnocratError::UnknownAgent(..)) => McpError::InvalidParams(e.to_string()),
            other => McpError::Internal(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Error type for HTTP handlers. Rendered as `{ "error": message }`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(McpError::InvalidParams(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<McpError>() {
            e.status()
        } else if let Some(e) = self.0.downcast_ref::<TechnocratError>() {
            match e {
                TechnocratError::Template(_)
                | TechnocratError::InvalidDocumentName(_)
                | TechnocratError::InvalidFeatureName(_)
                | TechnocratError::UnknownAgent(..)
                | TechnocratError::NotInitialized => StatusCode::BAD_REQUEST,
                TechnocratError::FeatureNotFound(_)
                | TechnocratError::DocumentNotFound(_)
                | TechnocratError::CommandNotFound(_)
                | TechnocratError::AssetMissing(_) => StatusCode::NOT_FOUND,
                TechnocratError::FeatureExists(_) => StatusCode::CONFLICT,
                TechnocratError::Git(_)
                | TechnocratError::Io(_)
                | TechnocratError::Yaml(_)
                | TechnocratError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_rpc_codes() {
        assert_eq!(McpError::MethodNotFound("x".into()).code(), -32601);
        assert_eq!(McpError::not_found("prompt", "x").code(), -32601);
        assert_eq!(McpError::invalid_params("x").code(), -32602);
        assert_eq!(McpError::Internal("x".into()).code(), -32603);
    }

    #[test]
    fn core_errors_convert() {
        let e: McpError = TechnocratError::CommandNotFound("deploy".into()).into();
        assert_eq!(e.to_string(), "prompt not found: deploy");
        let e: McpError = TechnocratError::InvalidDocumentName("../x".into()).into();
        assert_eq!(e.code(), INVALID_PARAMS);
        let e: McpError = TechnocratError::Io(std::io::Error::other("disk")).into();
        assert_eq!(e.code(), INTERNAL_ERROR);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError(McpError::not_found("tool", "nope").into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_params_maps_to_400() {
        let response = AppError::bad_request("missing name").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn core_feature_exists_maps_to_409() {
        let response =
            AppError(TechnocratError::FeatureExists("001-a".into()).into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_errors_map_to_500() {
        let response = AppError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
