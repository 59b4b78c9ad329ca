//! Llama inference server client - forwards chat payloads verbatim / Llama服务器代理客户端

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::LlamaConfig;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Could not open a connection / 无法连接
    #[error("cannot connect to {0}")]
    Unreachable(String),

    #[error("invalid llama server url: {0}")]
    InvalidUrl(String),

    #[error("proxy request failed: {0}")]
    Request(String),
}

/// Upstream reply relayed to the caller / 上游响应
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub status: u16,
    pub body: Value,
}

/// Llama server health / 健康状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlamaHealth {
    Ok,
    Unhealthy(u16),
}

#[derive(Debug, Clone)]
pub struct LlamaClient {
    server_url: String,
    base: Url,
    client: Client,
    chat_timeout: Duration,
    health_timeout: Duration,
}

impl LlamaClient {
    pub fn new(config: &LlamaConfig) -> Result<Self, ProxyError> {
        let base = Url::parse(&config.server_url)
            .map_err(|e| ProxyError::InvalidUrl(format!("{}: {}", config.server_url, e)))?;
        let client = Client::builder()
            .build()
            .map_err(|e| ProxyError::Request(e.to_string()))?;

        Ok(Self {
            server_url: config.server_url.clone(),
            base,
            client,
            chat_timeout: Duration::from_secs(config.chat_timeout_secs),
            health_timeout: Duration::from_secs(config.health_timeout_secs),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Resolve an absolute path against the server url / 拼接上游地址
    pub fn endpoint(&self, path: &str) -> Result<Url, ProxyError> {
        self.base
            .join(path)
            .map_err(|e| ProxyError::InvalidUrl(e.to_string()))
    }

    fn map_send_error(&self, e: reqwest::Error) -> ProxyError {
        if e.is_connect() {
            ProxyError::Unreachable(self.server_url.clone())
        } else {
            ProxyError::Request(e.to_string())
        }
    }

    /// POST the payload to /v1/chat/completions / 代理聊天请求
    pub async fn chat(&self, payload: &Value) -> Result<ChatReply, ProxyError> {
        let url = self.endpoint("/v1/chat/completions")?;
        tracing::debug!("Forwarding chat request to {}", url);

        let response = self
            .client
            .post(url)
            .timeout(self.chat_timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ProxyError::Request(e.to_string()))?;

        Ok(ChatReply { status, body })
    }

    /// GET /health on the llama server / 检查llama服务器健康状态
    pub async fn health(&self) -> Result<LlamaHealth, ProxyError> {
        let url = self.endpoint("/health")?;
        let response = self
            .client
            .get(url)
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if response.status().is_success() {
            Ok(LlamaHealth::Ok)
        } else {
            Ok(LlamaHealth::Unhealthy(response.status().as_u16()))
        }
    }
}
