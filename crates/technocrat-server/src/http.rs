//! HTTP surface: JSON-RPC at `POST /mcp` plus REST-style listing and call
//! routes over the same registries.

use crate::error::{AppError, McpError};
use crate::prompts::user_input_arg;
use crate::protocol;
use crate::server::McpServer;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

type AppState = Arc<McpServer>;

/// Build the router. Used by [`serve`] and by integration tests.
pub fn build_router(server: Arc<McpServer>, timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/mcp", post(json_rpc))
        .route("/mcp/tools", get(list_tools))
        .route("/mcp/tools/call", post(call_tool))
        .route("/mcp/prompts", get(list_prompts))
        .route("/mcp/prompts/get", post(get_prompt))
        .route("/mcp/resources", get(list_resources))
        .route("/mcp/resources/read", post(read_resource))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(server)
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn serve(
    server: Arc<McpServer>,
    host: &str,
    port: u16,
    timeout: Duration,
) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(server, listener, timeout).await
}

/// Serve on a pre-bound listener, so callers binding port 0 can read the
/// actual port first.
pub async fn serve_on(
    server: Arc<McpServer>,
    listener: tokio::net::TcpListener,
    timeout: Duration,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let app = build_router(server, timeout);
    tracing::info!("technocrat MCP server listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn json_rpc(State(server): State<AppState>, body: String) -> Response {
    match protocol::handle_message(&server, &body) {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn list_tools(State(server): State<AppState>) -> Json<Value> {
    Json(json!({ "tools": server.list_tools() }))
}

#[derive(Debug, Deserialize)]
struct ToolCallBody {
    name: String,
    #[serde(default)]
    arguments: Value,
}

async fn call_tool(
    State(server): State<AppState>,
    Json(body): Json<ToolCallBody>,
) -> Result<Json<Value>, AppError> {
    let result = server.call_tool(&body.name, body.arguments)?;
    Ok(Json(serde_json::to_value(result)?))
}

async fn list_prompts(State(server): State<AppState>) -> Json<Value> {
    Json(json!({ "prompts": server.list_prompts() }))
}

#[derive(Debug, Deserialize)]
struct PromptGetBody {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

async fn get_prompt(
    State(server): State<AppState>,
    Json(body): Json<PromptGetBody>,
) -> Result<Json<Value>, AppError> {
    let user_input = user_input_arg(body.arguments.as_ref())?;
    let result = server.get_prompt(&body.name, &user_input)?;
    Ok(Json(serde_json::to_value(result)?))
}

async fn list_resources(State(server): State<AppState>) -> Json<Value> {
    Json(json!({ "resources": server.list_resources() }))
}

#[derive(Debug, Deserialize)]
struct ResourceReadBody {
    uri: String,
}

async fn read_resource(
    State(server): State<AppState>,
    Json(body): Json<ResourceReadBody>,
) -> Result<Json<Value>, AppError> {
    if body.uri.is_empty() {
        return Err(McpError::invalid_params("uri must not be empty").into());
    }
    let contents = server.read_resource(&body.uri)?;
    Ok(Json(json!({ "contents": [contents] })))
}
