//! Search result schema / 搜索结果结构定义

use std::collections::HashMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Context snippets grouped by file, in insertion order / 按文件分组的上下文片段（保持插入顺序）
///
/// Serialized as a JSON object whose keys appear in the order files were
/// first seen. Within a file, snippets keep the order they were pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileResultSet {
    entries: Vec<(String, Vec<String>)>,
    positions: HashMap<String, usize>,
}

impl FileResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one snippet under `file` / 追加单个片段
    pub fn push(&mut self, file: &str, snippet: String) {
        self.slot(file).push(snippet);
    }

    /// Append several snippets under `file`, keeping their order / 批量追加
    pub fn extend<I>(&mut self, file: &str, snippets: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.slot(file).extend(snippets);
    }

    fn slot(&mut self, file: &str) -> &mut Vec<String> {
        let idx = match self.positions.get(file) {
            Some(&idx) => idx,
            None => {
                self.entries.push((file.to_string(), Vec::new()));
                let idx = self.entries.len() - 1;
                self.positions.insert(file.to_string(), idx);
                idx
            }
        };
        &mut self.entries[idx].1
    }

    pub fn get(&self, file: &str) -> Option<&[String]> {
        self.positions
            .get(file)
            .map(|&idx| self.entries[idx].1.as_slice())
    }

    /// Number of files with at least one snippet / 文件数
    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    /// Total snippets across all files / 总匹配数
    pub fn total_matches(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, snippets)| (name.as_str(), snippets.as_slice()))
    }
}

impl Serialize for FileResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, snippets) in &self.entries {
            map.serialize_entry(name, snippets)?;
        }
        map.end()
    }
}

/// Which path answered a search / 结果来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    /// Precomputed snapshot / 缓存
    Cache,
    /// Live scan of the content root / 实时搜索
    Live,
}

impl fmt::Display for SearchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchSource::Cache => f.write_str("cache"),
            SearchSource::Live => f.write_str("live"),
        }
    }
}

/// Result of a successful search / 搜索结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub data: FileResultSet,
    pub count: usize,
    pub source: SearchSource,
}

impl SearchOutcome {
    pub fn new(data: FileResultSet, source: SearchSource) -> Self {
        let count = data.total_matches();
        Self { data, count, source }
    }

    /// Human readable summary line / 结果摘要
    pub fn message(&self) -> String {
        format!("found {} matches (from {})", self.count, self.source)
    }
}
