use crate::error::{McpError, INVALID_REQUEST, PARSE_ERROR};
use crate::prompts::user_input_arg;
use crate::server::McpServer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 protocol types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Message handling
// ---------------------------------------------------------------------------

/// Reply for a message that could not be read as JSON at all.
pub fn parse_error(detail: impl std::fmt::Display) -> JsonRpcResponse {
    JsonRpcResponse::failure(None, PARSE_ERROR, format!("parse error: {detail}"))
}

/// Handle one raw JSON-RPC message. `None` means no reply is due: the
/// message was a notification (an object without an `id` key).
pub fn handle_message(server: &McpServer, raw: &str) -> Option<JsonRpcResponse> {
    match serde_json::from_str(raw) {
        Ok(value) => handle_value(server, value),
        Err(e) => Some(parse_error(e)),
    }
}

/// Same as [`handle_message`] for an already parsed body.
pub fn handle_value(server: &McpServer, value: Value) -> Option<JsonRpcResponse> {
    let Some(object) = value.as_object() else {
        return Some(JsonRpcResponse::failure(
            None,
            INVALID_REQUEST,
            "invalid request: expected a JSON object",
        ));
    };
    if !object.contains_key("id") {
        if let Some(method) = object.get("method").and_then(Value::as_str) {
            tracing::debug!(method, "notification received");
        }
        return None;
    }

    let id = value.get("id").cloned();
    match serde_json::from_value::<JsonRpcRequest>(value) {
        Ok(request) => Some(handle_request(server, &request)),
        Err(e) => Some(JsonRpcResponse::failure(
            id,
            INVALID_REQUEST,
            format!("invalid request: {e}"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Request dispatch
// ---------------------------------------------------------------------------

pub fn handle_request(server: &McpServer, req: &JsonRpcRequest) -> JsonRpcResponse {
    tracing::debug!(method = %req.method, "mcp request");
    match dispatch(server, req) {
        Ok(result) => JsonRpcResponse::success(req.id.clone(), result),
        Err(e) => {
            tracing::warn!(method = %req.method, error = %e, "mcp request failed");
            JsonRpcResponse::failure(req.id.clone(), e.code(), e.to_string())
        }
    }
}

fn dispatch(server: &McpServer, req: &JsonRpcRequest) -> Result<Value, McpError> {
    match req.method.as_str() {
        "initialize" => Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {},
                "prompts": {},
                "resources": {}
            },
            "serverInfo": {
                "name": "technocrat",
                "version": env!("CARGO_PKG_VERSION")
            }
        })),

        "ping" => Ok(json!({})),

        "tools/list" => Ok(json!({ "tools": server.list_tools() })),

        "tools/call" => {
            let params = require_params(req)?;
            let name = require_str(params, "name", "tool name")?;
            let args = params.get("arguments").cloned().unwrap_or(Value::Null);
            to_value(server.call_tool(name, args)?)
        }

        "prompts/list" => Ok(json!({ "prompts": server.list_prompts() })),

        "prompts/get" => {
            let params = require_params(req)?;
            let name = require_str(params, "name", "prompt name")?;
            let user_input = user_input_arg(params.get("arguments"))?;
            to_value(server.get_prompt(name, &user_input)?)
        }

        "resources/list" => Ok(json!({ "resources": server.list_resources() })),

        "resources/read" => {
            let params = require_params(req)?;
            let uri = require_str(params, "uri", "resource uri")?;
            let contents = server.read_resource(uri)?;
            Ok(json!({ "contents": [contents] }))
        }

        other => Err(McpError::MethodNotFound(other.to_string())),
    }
}

fn require_params(req: &JsonRpcRequest) -> Result<&Value, McpError> {
    req.params
        .as_ref()
        .ok_or_else(|| McpError::invalid_params("missing params"))
}

fn require_str<'a>(params: &'a Value, key: &str, what: &str) -> Result<&'a str, McpError> {
    params[key]
        .as_str()
        .ok_or_else(|| McpError::invalid_params(format!("missing {what} in params")))
}

fn to_value<T: Serialize>(v: T) -> Result<Value, McpError> {
    serde_json::to_value(v).map_err(|e| McpError::Internal(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_req(id: i64, method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".into(),
            id: Some(Value::Number(id.into())),
            method: method.to_string(),
            params,
        }
    }

    fn server() -> McpServer {
        McpServer::new("/nonexistent").unwrap()
    }

    #[test]
    fn initialize_returns_capabilities() {
        let resp = handle_request(&server(), &make_req(1, "initialize", Some(json!({}))));
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(result["capabilities"]["prompts"].is_object());
        assert_eq!(result["serverInfo"]["name"], "technocrat");
    }

    #[test]
    fn prompts_list_has_user_input_argument() {
        let resp = handle_request(&server(), &make_req(2, "prompts/list", None));
        let result = resp.result.unwrap();
        let prompts = result["prompts"].as_array().unwrap();
        assert_eq!(prompts.len(), 7);
        assert_eq!(prompts[0]["name"], "analyze");
        assert_eq!(prompts[0]["arguments"][0]["name"], "user_input");
        assert_eq!(prompts[0]["arguments"][0]["required"], false);
    }

    #[test]
    fn prompts_get_returns_string_content() {
        let resp = handle_request(
            &server(),
            &make_req(
                3,
                "prompts/get",
                Some(json!({"name": "spec", "arguments": {"user_input": "Photo albums"}})),
            ),
        );
        assert!(resp.error.is_none(), "{:?}", resp.error);
        let result = resp.result.unwrap();
        let message = &result["messages"][0];
        assert_eq!(message["role"], "user");
        let content = message["content"].as_str().unwrap();
        assert!(content.starts_with("# Spec\n\n## User Input\n\nPhoto albums"));
        assert!(content.contains("Feature description: Photo albums"));
        assert!(!result["description"].as_str().unwrap().is_empty());
    }

    #[test]
    fn prompts_get_unknown_is_method_not_found() {
        let resp = handle_request(
            &server(),
            &make_req(4, "prompts/get", Some(json!({"name": "deploy"}))),
        );
        assert_eq!(resp.error.unwrap().code, -32601);
    }

    #[test]
    fn prompts_get_missing_params() {
        let resp = handle_request(&server(), &make_req(5, "prompts/get", None));
        assert_eq!(resp.error.unwrap().code, -32602);
        let resp = handle_request(&server(), &make_req(6, "prompts/get", Some(json!({}))));
        assert_eq!(resp.error.unwrap().code, -32602);
    }

    #[test]
    fn template_failure_is_internal_error() {
        let server = McpServer::with_commands(
            "/nonexistent",
            vec![technocrat_core::commands::CommandDocument {
                name: "bad".into(),
                description: String::new(),
                body: "{{upper \"a\" \"b\"}}".into(),
            }],
        );
        let resp = handle_request(
            &server,
            &make_req(7, "prompts/get", Some(json!({"name": "bad"}))),
        );
        let err = resp.error.unwrap();
        assert_eq!(err.code, -32603);
        assert!(err.message.contains("template execute error in 'bad'"));
        assert!(err.message.contains("wrong number of args for upper"));
    }

    #[test]
    fn tools_call_round_trip() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("memory")).unwrap();
        let server = McpServer::new(dir.path()).unwrap();
        let resp = handle_request(
            &server,
            &make_req(
                8,
                "tools/call",
                Some(json!({"name": "get_workspace_context", "arguments": {}})),
            ),
        );
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], false);
        let text = result["content"][0]["text"].as_str().unwrap();
        let ctx: Value = serde_json::from_str(text).unwrap();
        assert_eq!(ctx["root"], &*dir.path().to_string_lossy());
    }

    #[test]
    fn resources_read_template() {
        let resp = handle_request(
            &server(),
            &make_req(
                9,
                "resources/read",
                Some(json!({"uri": "technocrat://templates/tasks-template.md"})),
            ),
        );
        let result = resp.result.unwrap();
        assert!(result["contents"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("# Tasks"));
    }

    #[test]
    fn unknown_method() {
        let resp = handle_request(&server(), &make_req(10, "sampling/createMessage", None));
        let err = resp.error.unwrap();
        assert_eq!(err.code, -32601);
        assert!(err.message.contains("method not found"));
    }

    #[test]
    fn raw_messages() {
        let s = server();
        let parse = handle_message(&s, "{not json").unwrap();
        assert_eq!(parse.error.unwrap().code, -32700);

        assert!(handle_message(&s, r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .is_none());

        let invalid = handle_message(&s, r#"{"jsonrpc":"2.0","id":4}"#).unwrap();
        assert_eq!(invalid.id, Some(json!(4)));
        assert_eq!(invalid.error.unwrap().code, -32600);

        let ping = handle_message(&s, r#"{"jsonrpc":"2.0","id":"a","method":"ping"}"#).unwrap();
        assert_eq!(ping.result, Some(json!({})));
    }

    #[test]
    fn non_object_message_is_invalid_request() {
        let s = server();
        for raw in ["[1,2]", "\"hi\"", "42", "null"] {
            let resp = handle_message(&s, raw).unwrap();
            assert_eq!(resp.error.unwrap().code, -32600, "message {raw}");
            let wire = serde_json::to_value(handle_message(&s, raw).unwrap()).unwrap();
            assert_eq!(wire["id"], Value::Null);
        }
    }
}
