use serde::{Deserialize, Serialize};

use ragsearch_backend::search::{FileResultSet, SearchOutcome, SearchSource};

/// 搜索请求
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search_string: String,
}

/// 搜索响应
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub message: String,
    pub data: FileResultSet,
    pub count: usize,
    pub source: Option<SearchSource>,
}

impl SearchResponse {
    pub fn success(outcome: SearchOutcome) -> Self {
        Self {
            success: true,
            message: outcome.message(),
            count: outcome.count,
            source: Some(outcome.source),
            data: outcome.data,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            data: FileResultSet::new(),
            count: 0,
            source: None,
        }
    }
}

/// 健康检查中的缓存状态
#[derive(Debug, Serialize)]
pub struct CacheHealth {
    pub status: String,
    pub entries: usize,
}

/// 健康检查中的匹配器状态
#[derive(Debug, Serialize)]
pub struct MatcherHealth {
    pub status: String,
}

/// 搜索服务健康状态
#[derive(Debug, Serialize)]
pub struct SearchHealth {
    pub status: String,
    pub message: String,
    pub cache: CacheHealth,
    pub matcher: MatcherHealth,
}

/// 搜索统计
#[derive(Debug, Serialize)]
pub struct SearchStats {
    pub cache_entries: usize,
    pub cached_files: usize,
    pub matcher_available: bool,
}
