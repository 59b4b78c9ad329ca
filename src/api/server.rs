use axum::{
    extract::State,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// 系统信息
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub service: String,
    pub version: String,
    pub build_time: String,
    pub started_at: String,
    pub llama_server: String,
    pub search_enabled: bool,
    pub cache_entries: usize,
    pub matcher_available: bool,
}

/// GET /api/system/info - 获取系统信息
pub async fn system_info(State(state): State<Arc<AppState>>) -> Json<SystemInfo> {
    let search = &state.search;
    Json(SystemInfo {
        service: "unified_llama_rag".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_time: env!("BUILD_TIME").to_string(),
        started_at: state.started_at.to_rfc3339(),
        llama_server: state.config.llama.server_url.clone(),
        search_enabled: search.matcher_available() || search.cache_available(),
        cache_entries: search.cache_entries(),
        matcher_available: search.matcher_available(),
    })
}
