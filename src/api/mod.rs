pub mod llama;
pub mod search;
pub mod server;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Search-only service (standalone port) / 独立搜索服务路由
pub fn search_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/search", post(search::search))
        .route("/api/health", get(search::search_health))
        .route("/api/stats", get(search::search_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Combined service: search, chat proxy, system info, static UI / 统一服务路由
pub fn unified_router(state: Arc<AppState>) -> Router {
    let static_dir = ServeDir::new(&state.config.search.static_dir);

    Router::new()
        // 搜索API
        .route("/api/search", post(search::search))
        .route("/api/search/health", get(search::search_health))
        .route("/api/search/stats", get(search::search_stats))
        .route("/api/health", get(search::search_health))
        .route("/api/stats", get(search::search_stats))
        // Llama API 代理
        .route("/api/llama/chat", post(llama::llama_chat))
        .route("/api/llama/health", get(llama::llama_health))
        // 系统信息
        .route("/api/system/info", get(server::system_info))
        .fallback_service(static_dir)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use ragsearch_backend::config::AppConfig;
    use ragsearch_backend::search::{
        CacheSnapshot, CacheStore, DocumentScanner, DocumentSearch, FileResultSet, ScanCancel,
        SearchCoordinator, SearchError,
    };
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn state_with(cache: CacheStore, scanner: Option<DocumentScanner>, config: AppConfig) -> Arc<AppState> {
        let scanner = scanner.map(|s| Arc::new(s) as Arc<dyn DocumentSearch>);
        let search = SearchCoordinator::new(Arc::new(cache), scanner);
        Arc::new(AppState::new(config, search))
    }

    fn state_with_search(scanner: Arc<dyn DocumentSearch>, config: AppConfig) -> Arc<AppState> {
        let search = SearchCoordinator::new(Arc::new(CacheStore::new()), Some(scanner));
        Arc::new(AppState::new(config, search))
    }

    /// Scans until cancelled, giving up after a few seconds
    #[derive(Default)]
    struct StallingScanner {
        saw_cancel: AtomicBool,
    }

    impl DocumentSearch for StallingScanner {
        fn search(&self, _needle: &str, cancel: &ScanCancel) -> Result<FileResultSet, SearchError> {
            let deadline = Instant::now() + Duration::from_secs(5);
            while Instant::now() < deadline {
                if cancel.is_cancelled() {
                    self.saw_cancel.store(true, Ordering::SeqCst);
                    return Err(SearchError::Cancelled);
                }
                std::thread::sleep(Duration::from_millis(20));
            }
            Ok(FileResultSet::new())
        }
    }

    struct BrokenScanner;

    impl DocumentSearch for BrokenScanner {
        fn search(&self, _needle: &str, _cancel: &ScanCancel) -> Result<FileResultSet, SearchError> {
            Err(SearchError::Internal("cannot open /srv/private/index".to_string()))
        }
    }

    fn error_body(message: &str) -> Value {
        json!({
            "success": false,
            "message": message,
            "data": {},
            "count": 0,
            "source": null
        })
    }

    fn content_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("doc.md"), "one needle here, another needle there").unwrap();
        std::fs::write(dir.path().join("other.txt"), "nothing to see").unwrap();
        dir
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_search(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/search")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_live_search_response_shape() {
        let dir = content_dir();
        let state = state_with(CacheStore::new(), Some(DocumentScanner::new(dir.path(), 3)), AppConfig::default());

        let (status, body) = send(search_router(state), post_search(r#"{"search_string": "needle"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["source"], json!("live"));
        assert_eq!(body["count"], json!(2));
        assert_eq!(body["data"]["doc.md"], json!(["ne needle he", "er needle th"]));
        assert_eq!(body["message"], json!("found 2 matches (from live)"));
    }

    #[tokio::test]
    async fn test_blank_search_is_bad_request() {
        let state = state_with(CacheStore::new(), None, AppConfig::default());

        for payload in [r#"{"search_string": "   "}"#, r#"{}"#, "not json"] {
            let (status, body) = send(search_router(state.clone()), post_search(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, error_body("search string must not be empty"));
        }
    }

    #[tokio::test]
    async fn test_timed_out_search_cancels_scan() {
        let scanner = Arc::new(StallingScanner::default());
        let mut config = AppConfig::default();
        config.search.scan_timeout_secs = 1;
        let state = state_with_search(scanner.clone(), config);

        let started = Instant::now();
        let (status, body) = send(search_router(state), post_search(r#"{"search_string": "needle"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, error_body("search failed"));
        assert!(started.elapsed() < Duration::from_secs(4));

        // the blocking task sees the flag on its next check
        let deadline = Instant::now() + Duration::from_secs(2);
        while !scanner.saw_cancel.load(Ordering::SeqCst) && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(scanner.saw_cancel.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_internal_failure_hides_detail() {
        let state = state_with_search(Arc::new(BrokenScanner), AppConfig::default());

        let (status, body) = send(unified_router(state), post_search(r#"{"search_string": "needle"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, error_body("search failed"));
        assert!(!body.to_string().contains("/srv/private"));
    }

    #[tokio::test]
    async fn test_cache_hit_reported_as_cache() {
        let dir = content_dir();
        let mut snapshot = CacheSnapshot::new();
        snapshot.insert("cached.md_1", "a Needle from the snapshot");
        snapshot.insert("cached.md_2", "unrelated");
        let state = state_with(
            CacheStore::from_snapshot(snapshot),
            Some(DocumentScanner::new(dir.path(), 3)),
            AppConfig::default(),
        );

        let (status, body) = send(unified_router(state), post_search(r#"{"search_string": "needle"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], json!("cache"));
        assert_eq!(body["data"], json!({ "cached.md": ["a Needle from the snapshot"] }));
    }

    #[tokio::test]
    async fn test_health_and_stats() {
        let dir = content_dir();
        let mut snapshot = CacheSnapshot::new();
        snapshot.insert("a.md_1", "x");
        snapshot.insert("a.md_2", "y");
        snapshot.insert("b.md", "z");
        let state = state_with(
            CacheStore::from_snapshot(snapshot),
            Some(DocumentScanner::new(dir.path(), 3)),
            AppConfig::default(),
        );

        let (status, body) = send(unified_router(state.clone()), get_req("/api/search/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));
        assert_eq!(body["cache"], json!({ "status": "loaded", "entries": 3 }));
        assert_eq!(body["matcher"], json!({ "status": "initialized" }));

        let (_, body) = send(unified_router(state.clone()), get_req("/api/search/stats")).await;
        assert_eq!(body, json!({ "cache_entries": 3, "cached_files": 2, "matcher_available": true }));

        let (_, body) = send(search_router(state), get_req("/api/stats")).await;
        assert_eq!(body["cached_files"], json!(2));
    }

    #[tokio::test]
    async fn test_degraded_startup_is_reported() {
        let state = state_with(CacheStore::new(), None, AppConfig::default());

        let (_, body) = send(search_router(state.clone()), get_req("/api/health")).await;
        assert_eq!(body["cache"]["status"], json!("not loaded"));
        assert_eq!(body["matcher"]["status"], json!("not initialized"));

        let (status, body) = send(search_router(state), post_search(r#"{"search_string": "x"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], json!("cache"));
        assert_eq!(body["count"], json!(0));
    }

    #[tokio::test]
    async fn test_system_info() {
        let state = state_with(CacheStore::new(), None, AppConfig::default());
        let (status, body) = send(unified_router(state), get_req("/api/system/info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], json!("unified_llama_rag"));
        assert_eq!(body["llama_server"], json!("http://localhost:8000"));
        assert_eq!(body["search_enabled"], json!(false));
        assert_eq!(body["matcher_available"], json!(false));
    }

    #[tokio::test]
    async fn test_chat_proxy_unreachable_is_503() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = AppConfig::default();
        config.llama.server_url = format!("http://{}", addr);
        let state = state_with(CacheStore::new(), None, config);

        let request = Request::builder()
            .method("POST")
            .uri("/api/llama/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"messages": []}"#))
            .unwrap();
        let (status, body) = send(unified_router(state.clone()), request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], json!("llama server unreachable"));

        let (status, body) = send(unified_router(state), get_req("/api/llama/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], json!("error"));
        assert_eq!(body["url"], json!(format!("http://{}", addr)));
    }

    #[tokio::test]
    async fn test_static_fallback_serves_ui() {
        let ui = TempDir::new().unwrap();
        std::fs::write(ui.path().join("index.html"), "<html>search</html>").unwrap();
        let mut config = AppConfig::default();
        config.search.static_dir = ui.path().to_string_lossy().into_owned();
        let state = state_with(CacheStore::new(), None, config);

        let response = unified_router(state).oneshot(get_req("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<html>search</html>");
    }
}
