//! 服务器模块
//!
//! 提供 MCP 服务器的实现，支持多种传输协议。

pub mod handler;
pub mod transport;

use crate::config::AppConfig;
use crate::data::FoodService;
use crate::error::Result;
use crate::tools::ToolRegistry;
use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ProtocolVersion, ServerCapabilities, ServerCapabilitiesTools,
};
use std::sync::Arc;

/// MCP 服务器
#[derive(Clone)]
pub struct FoodServer {
    config: AppConfig,
    service: Arc<FoodService>,
    tool_registry: Arc<ToolRegistry>,
}

impl FoodServer {
    /// 根据配置创建服务器，数据集通过 HTTP 获取
    pub fn new(config: AppConfig) -> Result<Self> {
        let service = Arc::new(FoodService::from_config(&config)?);
        Ok(Self::with_service(config, service))
    }

    /// 使用已有的数据服务创建服务器
    #[must_use]
    pub fn with_service(config: AppConfig, service: Arc<FoodService>) -> Self {
        let tool_registry = Arc::new(crate::tools::create_default_registry(&service));
        Self {
            config,
            service,
            tool_registry,
        }
    }

    /// 获取应用配置
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取数据服务
    #[must_use]
    pub fn service(&self) -> &Arc<FoodService> {
        &self.service
    }

    /// 获取工具注册器
    #[must_use]
    pub fn tool_registry(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// 启动前预热数据集，失败只记录警告
    pub async fn warm_up(&self) {
        if !self.config.cache.warm_on_start {
            return;
        }
        let failed = self.service.warm_up().await;
        if failed.is_empty() {
            tracing::info!("数据集预热完成");
        } else {
            tracing::warn!("部分数据集预热失败: {}，将在首次请求时重试", failed.join(", "));
        }
    }

    /// 获取服务器信息
    #[must_use]
    pub fn server_info(&self) -> InitializeResult {
        let server = &self.config.server;
        InitializeResult {
            server_info: Implementation {
                name: server.name.clone(),
                version: server.version.clone(),
                title: Some("Thai Food MCP Server".to_string()),
                description: server.description.clone(),
                icons: vec![],
                website_url: Some(self.service.sources().encyclopedia.site_base().to_string()),
            },
            capabilities: ServerCapabilities {
                tools: Some(ServerCapabilitiesTools { list_changed: None }),
                resources: None,
                prompts: None,
                experimental: None,
                completions: None,
                logging: None,
                tasks: None,
            },
            protocol_version: ProtocolVersion::V2025_11_25.into(),
            instructions: Some(
                "使用此服务器查询泰国美食数据：食物词典（德语/英语释义）、烹饪书目、食谱库和美食百科。\
                 查询泰语词条请先用 translate_word，找不到时改用 search_dictionary。"
                    .to_string(),
            ),
            meta: None,
        }
    }

    /// 运行 Stdio 服务器
    pub async fn run_stdio(&self) -> Result<()> {
        transport::run_stdio_server(self).await
    }

    /// 运行 HTTP 服务器
    pub async fn run_http(&self) -> Result<()> {
        transport::run_http_server(self).await
    }

    /// 运行 SSE 服务器
    pub async fn run_sse(&self) -> Result<()> {
        transport::run_sse_server(self).await
    }

    /// 运行混合（HTTP + SSE）服务器
    pub async fn run_hybrid(&self) -> Result<()> {
        transport::run_hybrid_server(self).await
    }
}
