//! 数据集获取模块
//!
//! 通过 HTTP 获取 JSON 文档。任何失败都以单一的 [`Error::Fetch`] 返回，不做重试。

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

/// 数据集来源 trait
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// 获取 `url` 处的 JSON 文档
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value>;
}

/// 基于 reqwest 的 HTTP 数据集来源
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// 使用已有客户端创建
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// 获取 HTTP 客户端
    #[must_use]
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl DatasetSource for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        tracing::debug!("请求数据集: {url}");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::fetch(url, format!("HTTP 请求失败: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("HTTP 状态码: {status}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_json_content_type(&content_type) {
            return Err(Error::fetch(
                url,
                format!("响应不是 JSON (Content-Type: {content_type})"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::fetch(url, format!("读取响应失败: {e}")))?;

        serde_json::from_slice(&body).map_err(|e| Error::fetch(url, format!("JSON 解析失败: {e}")))
    }
}

/// `application/json`、`application/ld+json` 等均视为 JSON
fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("Application/JSON"));
        assert!(is_json_content_type("application/ld+json"));
        assert!(!is_json_content_type("text/html; charset=utf-8"));
        assert!(!is_json_content_type(""));
    }
}
