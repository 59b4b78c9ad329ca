//! Cache store - precomputed snippets loaded from a flat JSON snapshot / 缓存搜索结果
//!
//! Snapshot format: one JSON object, `key -> snippet`. A key is the file
//! name, or `name_<n>` (1-based) when that file produced several snippets.
//! Key order in the file is the iteration order used by lookups.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{Result, SearchError};
use super::schema::FileResultSet;

/// Flattened `key -> snippet` mapping, order preserving / 扁平化的缓存快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl CacheSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, snippet: impl Into<String>) {
        let key = key.into();
        let snippet = snippet.into();
        match self.positions.get(&key) {
            Some(&idx) => self.entries[idx].1 = snippet,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, snippet));
            }
        }
    }

    /// Flatten a result set into snapshot keys / 展平结果，每个匹配作为一个条目
    pub fn flatten(results: &FileResultSet) -> Self {
        let mut snapshot = Self::new();
        for (file, snippets) in results.iter() {
            if snippets.len() == 1 {
                snapshot.insert(file, snippets[0].clone());
            } else {
                for (i, snippet) in snippets.iter().enumerate() {
                    snapshot.insert(format!("{}_{}", file, i + 1), snippet.clone());
                }
            }
        }
        snapshot
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SearchError::Internal(e.to_string()))
    }

    /// Read and parse a snapshot file / 读取缓存快照
    pub fn read_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SearchError::SnapshotLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| SearchError::SnapshotLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write the snapshot as pretty JSON / 保存到文件
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_json_pretty()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SearchError::Internal(e.to_string()))?;
            }
        }
        std::fs::write(path, content).map_err(|e| SearchError::Internal(e.to_string()))
    }
}

impl Serialize for CacheSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, snippet) in &self.entries {
            map.serialize_entry(key, snippet)?;
        }
        map.end()
    }
}

struct SnapshotVisitor;

impl<'de> Visitor<'de> for SnapshotVisitor {
    type Value = CacheSnapshot;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object mapping keys to snippet strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut snapshot = CacheSnapshot::new();
        snapshot.entries.reserve(access.size_hint().unwrap_or(0));
        while let Some((key, snippet)) = access.next_entry::<String, String>()? {
            snapshot.insert(key, snippet);
        }
        Ok(snapshot)
    }
}

impl<'de> Deserialize<'de> for CacheSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(SnapshotVisitor)
    }
}

/// Recover the file identifier from a snapshot key / 从缓存键提取文件名
///
/// Strips a trailing `_<digits>` ordinal; any other key is used verbatim.
pub fn derive_file_id(key: &str) -> &str {
    match key.rsplit_once('_') {
        Some((base, ordinal))
            if !base.is_empty() && !ordinal.is_empty() && ordinal.bytes().all(|b| b.is_ascii_digit()) =>
        {
            base
        }
        _ => key,
    }
}

/// Read-only snippet cache / 缓存存储
#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    snapshot: CacheSnapshot,
    /// Lowercased snippets, parallel to `snapshot` entries / 小写副本
    folded: Vec<String>,
    loaded: bool,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CacheSnapshot) -> Self {
        let folded = snapshot.iter().map(|(_, snippet)| snippet.to_lowercase()).collect();
        Self {
            snapshot,
            folded,
            loaded: true,
        }
    }

    /// Load a snapshot file; absence or parse failure leaves the cache empty / 加载缓存的搜索结果
    pub fn load(&mut self, path: &Path) -> bool {
        if !path.exists() {
            tracing::warn!("Snapshot file not found: {:?}, cache stays empty", path);
            return false;
        }

        match CacheSnapshot::read_from(path) {
            Ok(snapshot) => {
                tracing::info!("Loaded cached search results: {} entries", snapshot.len());
                *self = Self::from_snapshot(snapshot);
                true
            }
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded && !self.snapshot.is_empty()
    }

    pub fn entries(&self) -> usize {
        self.snapshot.len()
    }

    /// Distinct derived file identifiers / 缓存涉及的文件数
    pub fn cached_files(&self) -> usize {
        let mut seen: Vec<&str> = self.snapshot.iter().map(|(k, _)| derive_file_id(k)).collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }

    /// Case-insensitive containment lookup over cached snippets / 在缓存中搜索
    pub fn lookup(&self, needle: &str) -> FileResultSet {
        let mut results = FileResultSet::new();
        if self.snapshot.is_empty() {
            return results;
        }

        let needle = needle.to_lowercase();
        for ((key, snippet), folded) in self.snapshot.iter().zip(&self.folded) {
            if folded.contains(&needle) {
                results.push(derive_file_id(key), snippet.to_string());
            }
        }
        results
    }
}
