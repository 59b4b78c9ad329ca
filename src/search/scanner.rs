//! Document scanner - exhaustive substring search over a content tree / 文档扫描器
//!
//! - Walks the content root for eligible text files (sorted by path)
//! - Per file: case-sensitive, overlapping search; each hit yields a context window
//! - Per-file failures become `FileScan::Skipped` and never abort the scan
//! - Files are scanned in parallel, results are re-assembled in path order

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use walkdir::WalkDir;

use super::context::extract_context;
use super::error::{Result, SearchError};
use super::schema::FileResultSet;
use crate::utils::{file_id, has_extension};

/// Default context window (characters on each side) / 默认上下文长度
pub const DEFAULT_CONTEXT_LENGTH: usize = 100;

/// Recognised text formats / 支持的文本格式
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["md", "txt"];

pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

/// Cooperative cancellation flag, checked between files / 扫描取消标志
#[derive(Debug, Clone, Default)]
pub struct ScanCancel(Arc<AtomicBool>);

impl ScanCancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of scanning one file / 单个文件的扫描结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileScan {
    Matched {
        path: PathBuf,
        file_id: String,
        contexts: Vec<String>,
    },
    NoMatch {
        path: PathBuf,
    },
    Skipped {
        path: PathBuf,
        reason: SearchError,
    },
}

/// Document scanner bound to one content root / 文档扫描器
#[derive(Debug, Clone)]
pub struct DocumentScanner {
    root: PathBuf,
    context_length: usize,
    extensions: Vec<String>,
}

impl DocumentScanner {
    pub fn new(root: impl Into<PathBuf>, context_length: usize) -> Self {
        Self {
            root: root.into(),
            context_length,
            extensions: default_extensions(),
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn context_length(&self) -> usize {
        self.context_length
    }

    /// All eligible files under the root, sorted by path / 查找所有可搜索文件
    pub fn find_files(&self) -> Vec<PathBuf> {
        if !self.root.exists() {
            tracing::warn!("Content directory does not exist: {:?}", self.root);
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry under {:?}: {}", self.root, err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(|e| has_extension(e.path(), &self.extensions))
            .map(|e| e.into_path())
            .collect();

        files.sort();
        files
    }

    /// Every overlapping occurrence of `needle`, as context windows / 查找所有匹配（允许重叠）
    ///
    /// The cursor advances one character past each hit start, so
    /// occurrences that share characters are all reported.
    pub fn find_matches(&self, content: &str, needle: &str) -> Vec<String> {
        let mut matches = Vec::new();
        if needle.is_empty() {
            return matches;
        }

        let mut cursor = 0;
        while let Some(pos) = content[cursor..].find(needle) {
            let at = cursor + pos;
            matches.push(extract_context(content, at, needle.len(), self.context_length).to_string());
            // `at` is a char boundary and a non-empty needle starts with a char there
            let step = content[at..].chars().next().map(char::len_utf8).unwrap_or(1);
            cursor = at + step;
        }
        matches
    }

    /// Scan a single file / 扫描单个文件
    pub fn scan_file(&self, path: &Path, needle: &str) -> FileScan {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                return FileScan::Skipped {
                    path: path.to_path_buf(),
                    reason: SearchError::FileRead {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    },
                }
            }
        };

        let contexts = self.find_matches(&content, needle);
        if contexts.is_empty() {
            FileScan::NoMatch { path: path.to_path_buf() }
        } else {
            FileScan::Matched {
                path: path.to_path_buf(),
                file_id: file_id(path),
                contexts,
            }
        }
    }

    /// Scan every eligible file, one `FileScan` per file in path order / 批量扫描
    pub fn scan_files(&self, needle: &str, cancel: &ScanCancel) -> Result<Vec<FileScan>> {
        let files = self.find_files();
        if files.is_empty() {
            tracing::info!("No eligible files found in {:?}", self.root);
            return Ok(Vec::new());
        }

        tracing::debug!("Scanning {} files for {:?}", files.len(), needle);

        let scans: Vec<FileScan> = files
            .par_iter()
            .map(|path| {
                if cancel.is_cancelled() {
                    return FileScan::Skipped {
                        path: path.clone(),
                        reason: SearchError::Cancelled,
                    };
                }
                self.scan_file(path, needle)
            })
            .collect();

        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        Ok(scans)
    }

    /// Full search: file name -> context windows / 在所有文件中搜索字符串
    ///
    /// An empty `needle` means no search is performed.
    pub fn scan(&self, needle: &str) -> Result<FileResultSet> {
        self.scan_with_cancel(needle, &ScanCancel::new())
    }

    pub fn scan_with_cancel(&self, needle: &str, cancel: &ScanCancel) -> Result<FileResultSet> {
        if needle.is_empty() {
            tracing::warn!("Empty search string, no search performed");
            return Ok(FileResultSet::new());
        }

        let scans = self.scan_files(needle, cancel)?;
        let results = collect_results(scans);
        tracing::info!(
            "Live scan for {:?} found {} matches in {} files",
            needle,
            results.total_matches(),
            results.file_count()
        );
        Ok(results)
    }
}

/// Fold per-file outcomes into a result set, logging skipped files / 汇总单文件结果
pub fn collect_results(scans: Vec<FileScan>) -> FileResultSet {
    let mut results = FileResultSet::new();
    for scan in scans {
        match scan {
            FileScan::Matched { file_id, contexts, .. } => {
                tracing::debug!("{}: {} matches", file_id, contexts.len());
                results.extend(&file_id, contexts);
            }
            FileScan::NoMatch { .. } => {}
            FileScan::Skipped { reason: reason @ SearchError::FileRead { .. }, .. } => {
                tracing::warn!("Skipping file: {}", reason);
            }
            FileScan::Skipped { path, reason } => {
                tracing::debug!("Skipped {:?}: {}", path, reason);
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &[u8]) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_overlapping_matches_are_all_reported() {
        let scanner = DocumentScanner::new("unused", 0);
        let matches = scanner.find_matches("aaaa", "aa");
        assert_eq!(matches, vec!["aa", "aa", "aa"]);

        let matches = scanner.find_matches("abababa", "aba");
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let scanner = DocumentScanner::new("unused", 0);
        assert!(scanner.find_matches("Needle", "needle").is_empty());
        assert_eq!(scanner.find_matches("needle Needle needle", "needle").len(), 2);
    }

    #[test]
    fn test_multibyte_content_advances_safely() {
        let scanner = DocumentScanner::new("unused", 1);
        let matches = scanner.find_matches("测测测", "测测");
        assert_eq!(matches, vec!["测测测", "测测测"]);
    }

    #[test]
    fn test_scan_groups_by_file_in_offset_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "doc.md", b"first needle, then another needle here");
        write(dir.path(), "notes/other.txt", b"no match in this one");
        write(dir.path(), "ignored.rs", b"needle in a non-text file");

        let scanner = DocumentScanner::new(dir.path(), 5);
        let results = scanner.scan("needle").unwrap();

        assert_eq!(results.file_count(), 1);
        let snippets = results.get("doc.md").unwrap();
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0], "irst needle, the");
        assert_eq!(snippets[1], "ther needle here");
    }

    #[test]
    fn test_files_are_sorted_and_recursive() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.md", b"x");
        write(dir.path(), "a/z.txt", b"x");
        write(dir.path(), "a.txt", b"x");

        let scanner = DocumentScanner::new(dir.path(), 0);
        let names: Vec<String> = scanner
            .find_files()
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a/z.txt", "a.txt", "b.md"]);
    }

    #[test]
    fn test_undecodable_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bad.md", &[0xff, 0xfe, 0x00, 0x6e]);
        write(dir.path(), "good.md", b"needle");

        let scanner = DocumentScanner::new(dir.path(), 10);
        let scans = scanner.scan_files("needle", &ScanCancel::new()).unwrap();
        match &scans[0] {
            FileScan::Skipped {
                path,
                reason: SearchError::FileRead { path: failed, .. },
            } => {
                assert!(path.ends_with("bad.md"));
                assert_eq!(path, failed);
            }
            other => panic!("expected a file read failure, got {:?}", other),
        }
        assert!(matches!(scans[1], FileScan::Matched { .. }));

        let results = collect_results(scans);
        assert_eq!(results.files().collect::<Vec<_>>(), vec!["good.md"]);
    }

    #[test]
    fn test_missing_root_returns_empty() {
        let scanner = DocumentScanner::new("/definitely/not/a/real/content/root", 100);
        let results = scanner.scan("anything").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_empty_needle_performs_no_search() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "doc.md", b"content");
        let scanner = DocumentScanner::new(dir.path(), 10);
        assert!(scanner.scan("").unwrap().is_empty());
    }

    #[test]
    fn test_same_name_in_two_directories_is_merged() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/readme.md", b"needle one");
        write(dir.path(), "b/readme.md", b"needle two");

        let scanner = DocumentScanner::new(dir.path(), 4);
        let results = scanner.scan("needle").unwrap();
        assert_eq!(results.file_count(), 1);
        assert_eq!(results.get("readme.md").unwrap(), &["needle one".to_string(), "needle two".to_string()]);
    }

    #[test]
    fn test_cancelled_scan_reports_cancellation() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "doc.md", b"needle");
        let scanner = DocumentScanner::new(dir.path(), 10);
        let cancel = ScanCancel::new();
        cancel.cancel();
        assert!(matches!(
            scanner.scan_with_cancel("needle", &cancel),
            Err(SearchError::Cancelled)
        ));
    }
}
