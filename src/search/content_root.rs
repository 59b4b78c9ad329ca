//! Content directory discovery / 内容目录探测

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::{Result, SearchError};

use crate::utils::{expand_home, has_extension};

/// Default candidate directories, tried in order / 默认候选目录
pub const DEFAULT_CANDIDATES: [&str; 6] = [
    "content",
    "@content",
    "rag/content",
    "../@content",
    "../../@content",
    "~/@content",
];

pub fn default_candidates() -> Vec<String> {
    DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect()
}

/// Whether `dir` holds at least one eligible file anywhere below it / 目录中是否有可搜索文件
pub fn has_eligible_file(dir: &Path, extensions: &[String]) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|e| e.file_type().is_file() && has_extension(e.path(), extensions))
}

/// First existing candidate directory containing an eligible file / 查找内容文件夹
///
/// `ContentRootUnavailable` when no candidate qualifies; callers run without
/// a live matcher in that case.
pub fn resolve_content_root(candidates: &[String], extensions: &[String]) -> Result<PathBuf> {
    for candidate in candidates {
        let path = expand_home(candidate);
        if path.is_dir() && has_eligible_file(&path, extensions) {
            tracing::info!("Found content directory: {:?}", path);
            return Ok(path);
        }
        tracing::debug!("Content candidate rejected: {:?}", path);
    }

    Err(SearchError::ContentRootUnavailable)
}
