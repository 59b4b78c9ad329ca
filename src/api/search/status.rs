use axum::{extract::State, Json};
use std::sync::Arc;

use crate::state::AppState;
use super::types::*;

/// GET /api/health, /api/search/health - 健康检查
pub async fn search_health(State(state): State<Arc<AppState>>) -> Json<SearchHealth> {
    let search = &state.search;
    let cache_status = if search.cache_available() { "loaded" } else { "not loaded" };
    let matcher_status = if search.matcher_available() { "initialized" } else { "not initialized" };

    Json(SearchHealth {
        status: "ok".to_string(),
        message: "search service is running".to_string(),
        cache: CacheHealth {
            status: cache_status.to_string(),
            entries: search.cache_entries(),
        },
        matcher: MatcherHealth {
            status: matcher_status.to_string(),
        },
    })
}

/// GET /api/stats, /api/search/stats - 统计信息
pub async fn search_stats(State(state): State<Arc<AppState>>) -> Json<SearchStats> {
    Json(SearchStats {
        cache_entries: state.search.cache_entries(),
        cached_files: state.search.cached_files(),
        matcher_available: state.search.matcher_available(),
    })
}
