//! Search coordinator - cache first, live scan on miss / 搜索协调器
//!
//! The live scan only runs when the cache returns nothing at all; a
//! cache hit is returned as-is even if a scan would find more.

use std::sync::Arc;

use super::cache::CacheStore;
use super::error::{Result, SearchError};
use super::scanner::{DocumentScanner, ScanCancel};
use super::schema::{FileResultSet, SearchOutcome, SearchSource};

/// Precomputed snippet source / 缓存查询接口
pub trait SnippetCache: Send + Sync {
    fn lookup(&self, needle: &str) -> FileResultSet;
    fn entries(&self) -> usize;
    fn cached_files(&self) -> usize;

    /// Whether a non-empty snapshot was loaded / 缓存是否已加载
    fn is_loaded(&self) -> bool {
        self.entries() > 0
    }
}

/// Live document search / 实时搜索接口
pub trait DocumentSearch: Send + Sync {
    fn search(&self, needle: &str, cancel: &ScanCancel) -> Result<FileResultSet>;
}

impl SnippetCache for CacheStore {
    fn lookup(&self, needle: &str) -> FileResultSet {
        CacheStore::lookup(self, needle)
    }

    fn entries(&self) -> usize {
        CacheStore::entries(self)
    }

    fn cached_files(&self) -> usize {
        CacheStore::cached_files(self)
    }

    fn is_loaded(&self) -> bool {
        CacheStore::is_loaded(self)
    }
}

impl DocumentSearch for DocumentScanner {
    fn search(&self, needle: &str, cancel: &ScanCancel) -> Result<FileResultSet> {
        self.scan_with_cancel(needle, cancel)
    }
}

/// Orchestrates one search request / 搜索请求处理
#[derive(Clone)]
pub struct SearchCoordinator {
    cache: Arc<dyn SnippetCache>,
    scanner: Option<Arc<dyn DocumentSearch>>,
}

impl SearchCoordinator {
    pub fn new(cache: Arc<dyn SnippetCache>, scanner: Option<Arc<dyn DocumentSearch>>) -> Self {
        Self { cache, scanner }
    }

    pub fn cache_entries(&self) -> usize {
        self.cache.entries()
    }

    pub fn cached_files(&self) -> usize {
        self.cache.cached_files()
    }

    pub fn cache_available(&self) -> bool {
        self.cache.is_loaded()
    }

    pub fn matcher_available(&self) -> bool {
        self.scanner.is_some()
    }

    pub fn handle(&self, search_string: &str) -> Result<SearchOutcome> {
        self.handle_with_cancel(search_string, &ScanCancel::new())
    }

    pub fn handle_with_cancel(&self, search_string: &str, cancel: &ScanCancel) -> Result<SearchOutcome> {
        let needle = search_string.trim();
        if needle.is_empty() {
            return Err(SearchError::InvalidInput);
        }

        let cached = self.cache.lookup(needle);
        if !cached.is_empty() {
            return Ok(SearchOutcome::new(cached, SearchSource::Cache));
        }

        match &self.scanner {
            Some(scanner) => {
                tracing::info!("No cached results for {:?}, falling back to live search", needle);
                let results = scanner.search(needle, cancel)?;
                Ok(SearchOutcome::new(results, SearchSource::Live))
            }
            None => Ok(SearchOutcome::new(FileResultSet::new(), SearchSource::Cache)),
        }
    }
}
