use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use ragsearch_backend::search::{ScanCancel, SearchError};

use crate::state::AppState;
use super::types::*;

/// POST /api/search - 搜索API端点
///
/// Cache lookup first, live scan on a complete miss. The work runs on the
/// blocking pool; when it outlives `scan_timeout` the scan is told to stop
/// between files and the caller gets a 500.
pub async fn search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> (StatusCode, Json<SearchResponse>) {
    let search_string = match payload {
        Ok(Json(req)) => req.search_string,
        Err(e) => {
            tracing::debug!("Unreadable search request body: {}", e);
            String::new()
        }
    };

    let coordinator = state.search.clone();
    let cancel = ScanCancel::new();
    let task_cancel = cancel.clone();
    let task = tokio::task::spawn_blocking(move || {
        coordinator.handle_with_cancel(&search_string, &task_cancel)
    });

    let result = match tokio::time::timeout(state.scan_timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(SearchError::Internal(e.to_string())),
        Err(_) => {
            cancel.cancel();
            tracing::warn!("Search timed out after {:?}, cancelling scan", state.scan_timeout);
            Err(SearchError::Cancelled)
        }
    };

    match result {
        Ok(outcome) => {
            tracing::debug!("{}", outcome.message());
            (StatusCode::OK, Json(SearchResponse::success(outcome)))
        }
        Err(e) => {
            if matches!(e, SearchError::InvalidInput) {
                tracing::debug!("Rejected search: {}", e);
            } else {
                tracing::error!("Search failed: {}", e);
            }
            let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(SearchResponse::error(e.public_message())))
        }
    }
}
