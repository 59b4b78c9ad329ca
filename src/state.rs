use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use ragsearch_backend::config::AppConfig;
use ragsearch_backend::llama::LlamaClient;
use ragsearch_backend::search::{
    resolve_content_root, CacheStore, DocumentScanner, DocumentSearch, SearchCoordinator,
};

/// Shared service state, built once at startup and read-only afterwards / 应用共享状态
pub struct AppState {
    pub config: AppConfig,
    pub search: SearchCoordinator,
    /// None when the configured llama url cannot be parsed / llama客户端
    pub llama: Option<LlamaClient>,
    pub scan_timeout: Duration,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Load the snapshot, resolve the content root, build the proxy client / 初始化
    pub fn init(config: AppConfig) -> Self {
        let mut cache = CacheStore::new();
        cache.load(&config.get_snapshot_path());

        let scanner: Option<Arc<dyn DocumentSearch>> =
            match resolve_content_root(&config.search.content_candidates, &config.search.extensions) {
                Ok(root) => {
                    let scanner = DocumentScanner::new(root, config.search.context_length)
                        .with_extensions(config.search.extensions.clone());
                    tracing::info!(
                        "Matcher initialized on {:?} ({} chars of context)",
                        scanner.root(),
                        scanner.context_length()
                    );
                    Some(Arc::new(scanner) as Arc<dyn DocumentSearch>)
                }
                Err(e) => {
                    tracing::warn!("{}, live search disabled", e);
                    None
                }
            };

        let search = SearchCoordinator::new(Arc::new(cache), scanner);
        Self::new(config, search)
    }

    pub fn new(config: AppConfig, search: SearchCoordinator) -> Self {
        let llama = match LlamaClient::new(&config.llama) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Chat proxy disabled: {}", e);
                None
            }
        };
        let scan_timeout = Duration::from_secs(config.search.scan_timeout_secs.max(1));

        Self {
            config,
            search,
            llama,
            scan_timeout,
            started_at: Utc::now(),
        }
    }
}
