//! Application configuration module / 应用配置模块
//!
//! Loaded from config.json in the working directory; a default file is
//! written on first run. Environment variables override the file:
//! `LLAMA_SERVER_URL`, `SEARCH_PORT`, `UNIFIED_PORT`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::search::content_root::default_candidates;
use crate::search::scanner::{default_extensions, DEFAULT_CONTEXT_LENGTH};

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    pub server: ServerConfig,
    /// Search configuration / 搜索配置
    pub search: SearchConfig,
    /// Llama inference server / Llama服务器配置
    pub llama: LlamaConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Combined (search + chat proxy) service port / 统一服务端口
    pub port: u16,
    /// Search-only service port / 搜索服务端口
    pub search_port: u16,
}

/// Search configuration / 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Characters of context on each side of a match / 上下文长度
    pub context_length: usize,
    /// Searchable file extensions / 可搜索的扩展名
    pub extensions: Vec<String>,
    /// Cache snapshot file / 缓存快照文件
    pub snapshot_path: String,
    /// Content directories tried in order / 候选内容目录
    pub content_candidates: Vec<String>,
    /// Live scan timeout in seconds / 实时搜索超时
    pub scan_timeout_secs: u64,
    /// Static UI assets directory / 静态文件目录
    pub static_dir: String,
}

/// Llama server configuration / Llama服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlamaConfig {
    pub server_url: String,
    pub chat_timeout_secs: u64,
    pub health_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            search_port: 5001,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            context_length: DEFAULT_CONTEXT_LENGTH,
            extensions: default_extensions(),
            snapshot_path: "rag/search_results.json".to_string(),
            content_candidates: default_candidates(),
            scan_timeout_secs: 30,
            static_dir: "static".to_string(),
        }
    }
}

impl Default for LlamaConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_string(),
            chat_timeout_secs: 300,
            health_timeout_secs: 5,
        }
    }
}

impl AppConfig {
    /// Get the combined service bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get the search-only service bind address / 获取搜索服务绑定地址
    pub fn get_search_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.search_port)
    }

    pub fn get_snapshot_path(&self) -> PathBuf {
        PathBuf::from(&self.search.snapshot_path)
    }

    /// Apply environment overrides / 应用环境变量覆盖
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; bad port values are ignored / 应用配置覆盖
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LLAMA_SERVER_URL") {
            if !url.trim().is_empty() {
                self.llama.server_url = url.trim().to_string();
            }
        }
        if let Some(port) = lookup("SEARCH_PORT") {
            match port.trim().parse::<u16>() {
                Ok(p) => self.server.search_port = p,
                Err(_) => tracing::warn!("Ignoring invalid SEARCH_PORT: {:?}", port),
            }
        }
        if let Some(port) = lookup("UNIFIED_PORT") {
            match port.trim().parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid UNIFIED_PORT: {:?}", port),
            }
        }
    }
}

/// Get the default config file path / 获取配置文件路径
pub fn default_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config(config_path, &config)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
pub fn save_config(config_path: &Path, config: &AppConfig) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}
