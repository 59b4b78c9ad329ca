//! Search error taxonomy / 搜索错误类型

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Empty or whitespace-only search string / 搜索字符串为空
    #[error("search string must not be empty")]
    InvalidInput,

    /// No usable content directory / 未找到内容目录
    #[error("no content directory with eligible files was found")]
    ContentRootUnavailable,

    /// A single file could not be read / 单个文件读取失败
    #[error("failed to read {path}: {reason}")]
    FileRead { path: PathBuf, reason: String },

    /// Snapshot missing or malformed / 缓存快照加载失败
    #[error("failed to load snapshot {path}: {reason}")]
    SnapshotLoad { path: PathBuf, reason: String },

    /// Scan gave up because it was cancelled / 搜索被取消或超时
    #[error("search cancelled before completion")]
    Cancelled,

    #[error("internal search failure: {0}")]
    Internal(String),
}

impl SearchError {
    /// HTTP status code for this error / 对应的HTTP状态码
    pub fn status_code(&self) -> u16 {
        match self {
            SearchError::InvalidInput => 400,
            _ => 500,
        }
    }

    /// Message safe to hand to an untrusted caller / 对外暴露的错误信息
    pub fn public_message(&self) -> &'static str {
        match self {
            SearchError::InvalidInput => "search string must not be empty",
            _ => "search failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_mapping() {
        assert_eq!(SearchError::InvalidInput.status_code(), 400);
        assert_eq!(SearchError::InvalidInput.public_message(), "search string must not be empty");

        let err = SearchError::Internal("worker pool poisoned".to_string());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), "search failed");
        assert!(err.to_string().contains("worker pool poisoned"));
    }

    #[test]
    fn test_file_read_names_the_file() {
        let err = SearchError::FileRead {
            path: PathBuf::from("docs/bad.md"),
            reason: "stream did not contain valid UTF-8".to_string(),
        };
        assert_eq!(err.to_string(), "failed to read docs/bad.md: stream did not contain valid UTF-8");
        assert_eq!(err.public_message(), "search failed");
    }
}
