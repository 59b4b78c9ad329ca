use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use ragsearch_backend::llama::{LlamaHealth, ProxyError};

use crate::state::AppState;

/// POST /api/llama/chat - 代理llama聊天请求
pub async fn llama_chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(client) = state.llama.as_ref() else {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({
            "error": "proxy request failed",
            "message": "llama server url is not configured correctly"
        })));
    };

    match client.chat(&payload).await {
        Ok(reply) => {
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(reply.body))
        }
        Err(ProxyError::Unreachable(url)) => {
            tracing::warn!("Llama server unreachable: {}", url);
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({
                "error": "llama server unreachable",
                "message": format!("cannot connect to {}", url)
            })))
        }
        Err(e) => {
            tracing::error!("Chat proxy failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({
                "error": "proxy request failed",
                "message": e.to_string()
            })))
        }
    }
}

/// GET /api/llama/health - 检查llama服务器健康状态
pub async fn llama_health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let Some(client) = state.llama.as_ref() else {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({
            "status": "error",
            "message": "llama server url is not configured correctly",
            "url": state.config.llama.server_url
        })));
    };
    let url = client.server_url();

    match client.health().await {
        Ok(LlamaHealth::Ok) => (StatusCode::OK, Json(json!({
            "status": "ok",
            "message": "llama server is running",
            "url": url
        }))),
        Ok(LlamaHealth::Unhealthy(code)) => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({
            "status": "error",
            "message": format!("llama server responded with HTTP {}", code),
            "url": url
        }))),
        Err(ProxyError::Unreachable(_)) => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({
            "status": "error",
            "message": format!("cannot connect to llama server: {}", url),
            "url": url
        }))),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({
            "status": "error",
            "message": format!("health check failed: {}", e),
            "url": url
        }))),
    }
}
