//! JSON-RPC 2.0 transport
//!
//! Exposes the three tip operations over a single `POST /rpc` endpoint,
//! plus a root status page and an agent manifest. Request bodies are parsed
//! by hand so malformed JSON can be answered with a proper JSON-RPC parse
//! error instead of a bare HTTP 400.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::tip::{TipError, TipService};

// JSON-RPC 2.0 protocol error codes
const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

// Server-defined codes for the tip error taxonomy
const PROVIDER_UNAVAILABLE: i64 = -32001;
const INVALID_CONTENT: i64 = -32002;
const STORAGE_WRITE_FAILED: i64 = -32003;

/// A decoded JSON-RPC request envelope
#[derive(Debug, Deserialize)]
struct RpcRequest {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

/// A JSON-RPC error object
#[derive(Debug, Serialize)]
pub struct RpcError {
    code: i64,
    message: String,
}

/// A JSON-RPC response envelope
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

impl RpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Builds the HTTP router for the service.
pub fn router(service: Arc<TipService>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/manifest", get(manifest))
        .route("/rpc", post(rpc_endpoint))
        .with_state(service)
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "tipd running",
        "rpc_endpoint": "POST /rpc",
    }))
}

async fn manifest() -> Json<Value> {
    Json(json!({
        "name": "tipd",
        "short_description": "Serves one AI-generated daily health tip.",
        "description": "Generates, caches, and serves a daily health and fitness tip \
            over JSON-RPC 2.0, keeping a bounded history on disk.",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn rpc_endpoint(State(service): State<Arc<TipService>>, body: String) -> Json<RpcResponse> {
    Json(handle_rpc(&service, &body).await)
}

/// Parses and dispatches one JSON-RPC request body.
pub async fn handle_rpc(service: &TipService, body: &str) -> RpcResponse {
    let raw: Value = match serde_json::from_str(body) {
        Ok(raw) => raw,
        Err(_) => {
            return RpcResponse::failure(Value::Null, PARSE_ERROR, "Parse error: invalid JSON")
        }
    };

    let id = raw.get("id").cloned().unwrap_or(Value::Null);
    let request: RpcRequest = match serde_json::from_value(raw) {
        Ok(request) => request,
        Err(err) => {
            return RpcResponse::failure(id, INVALID_REQUEST, format!("Invalid request: {err}"))
        }
    };

    if request.jsonrpc != "2.0" {
        return RpcResponse::failure(id, INVALID_REQUEST, "Invalid request: jsonrpc must be \"2.0\"");
    }

    // The three methods are parameterless.
    if matches!(&request.params, Some(params) if !params.is_null()) {
        return RpcResponse::failure(id, INVALID_PARAMS, "This service does not accept params");
    }

    tracing::debug!(method = %request.method, "rpc request");

    match request.method.as_str() {
        "get_daily_tip" => match service.daily_tip().await {
            Ok(entry) => RpcResponse::success(id, json!({ "tip": entry })),
            Err(err) => tip_failure(id, err),
        },
        "force_refresh" => match service.force_refresh().await {
            Ok(entry) => RpcResponse::success(id, json!({ "tip": entry })),
            Err(err) => tip_failure(id, err),
        },
        "get_history" => RpcResponse::success(id, json!({ "history": service.history() })),
        _ => RpcResponse::failure(id, METHOD_NOT_FOUND, "Method not found"),
    }
}

/// Maps a core failure to its wire-level error code.
fn tip_failure(id: Value, err: TipError) -> RpcResponse {
    let code = match err {
        TipError::ProviderUnavailable(_) => PROVIDER_UNAVAILABLE,
        TipError::InvalidContent(_) => INVALID_CONTENT,
        TipError::StorageWriteFailed(_) => STORAGE_WRITE_FAILED,
    };
    RpcResponse::failure(id, code, err.to_string())
}
