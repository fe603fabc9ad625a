//! 健康检查工具
#![allow(missing_docs)]

use crate::data::{CacheStatus, FoodService};
use crate::tools::{parse_args, Tool};
use crate::utils::HttpClientBuilder;
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 健康检查工具参数
#[macros::mcp_tool(
    name = "health_check",
    title = "健康检查",
    description = "检查数据源主机是否可达以及各数据集的缓存状态。用于诊断连接问题和监控系统可用性。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct HealthCheckTool {
    /// 检查类型
    #[json_schema(
        title = "检查类型",
        description = "要执行的健康检查类型：all（全部检查）、external（数据集地址可达性）、internal（缓存状态）",
        default = "all"
    )]
    pub check_type: Option<String>,

    /// 详细输出
    #[json_schema(
        title = "详细输出",
        description = "是否显示详细输出，包括每个检查的响应时间和缓存状态",
        default = false
    )]
    pub verbose: Option<bool>,
}

/// 健康检查结果
#[derive(Debug, Clone, Serialize)]
struct HealthStatus {
    status: String,
    timestamp: String,
    checks: Vec<HealthCheck>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cache: Vec<CacheStatus>,
    uptime: Duration,
}

/// 单个健康检查
#[derive(Debug, Clone, Serialize)]
struct HealthCheck {
    name: String,
    status: String,
    duration_ms: u64,
    message: Option<String>,
    error: Option<String>,
}

impl HealthCheck {
    fn healthy(name: &str, started: Instant, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: "healthy".to_string(),
            duration_ms: elapsed_ms(started),
            message: Some(message.into()),
            error: None,
        }
    }

    fn unhealthy(name: &str, started: Instant, error: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: "unhealthy".to_string(),
            duration_ms: elapsed_ms(started),
            message: None,
            error: Some(error.into()),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// 健康检查工具实现
pub struct HealthCheckToolImpl {
    service: Arc<FoodService>,
    start_time: Instant,
}

impl HealthCheckToolImpl {
    /// 创建新的健康检查工具
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }

    /// 对四个数据集地址发送 HEAD 请求
    async fn check_datasets(&self) -> Vec<HealthCheck> {
        let sources = self.service.sources();
        let targets = [
            ("dictionary", sources.dictionary.dataset_url.as_str()),
            ("books", sources.books.dataset_url.as_str()),
            ("library", sources.library.dataset_url.as_str()),
            ("encyclopedia", sources.encyclopedia.dataset_url.as_str()),
        ];

        let started = Instant::now();
        let client = match HttpClientBuilder::new()
            .timeout(Some(Duration::from_secs(5)))
            .build()
        {
            Ok(client) => client,
            Err(e) => return vec![HealthCheck::unhealthy("http_client", started, e.to_string())],
        };

        let mut checks = Vec::with_capacity(targets.len());
        for (name, url) in targets {
            let started = Instant::now();
            let check = match client.head(url).send().await {
                Ok(response) if response.status().is_success() => {
                    HealthCheck::healthy(name, started, format!("{url} 可访问"))
                }
                Ok(response) => HealthCheck::unhealthy(
                    name,
                    started,
                    format!("HTTP 状态码: {}", response.status()),
                ),
                Err(e) => HealthCheck::unhealthy(name, started, format!("请求失败: {e}")),
            };
            checks.push(check);
        }
        checks
    }

    /// 缓存检查只报告状态，冷缓存不算异常
    fn check_cache(&self) -> HealthCheck {
        let started = Instant::now();
        let warm = self
            .service
            .cache_status()
            .iter()
            .filter(|s| s.cached)
            .count();
        HealthCheck::healthy("cache", started, format!("{warm}/4 个数据集已缓存"))
    }

    /// 执行所有健康检查
    async fn perform_checks(&self, check_type: &str, verbose: bool) -> HealthStatus {
        let mut checks = Vec::new();

        match check_type {
            "all" => {
                checks.extend(self.check_datasets().await);
                checks.push(self.check_cache());
            }
            "external" => checks.extend(self.check_datasets().await),
            "internal" => checks.push(self.check_cache()),
            _ => {
                checks.push(HealthCheck {
                    name: "unknown_check".to_string(),
                    status: "unknown".to_string(),
                    duration_ms: 0,
                    message: None,
                    error: Some(format!("未知的检查类型: {check_type}")),
                });
            }
        }

        let overall_status = if checks.iter().all(|c| c.status == "healthy") {
            "healthy"
        } else if checks.iter().any(|c| c.status == "unhealthy") {
            "unhealthy"
        } else {
            "degraded"
        };

        HealthStatus {
            status: overall_status.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            checks: if verbose {
                checks
            } else {
                // 非详细模式下只返回有问题的检查
                checks
                    .into_iter()
                    .filter(|c| c.status != "healthy")
                    .collect()
            },
            cache: if verbose {
                self.service.cache_status()
            } else {
                Vec::new()
            },
            uptime: self.start_time.elapsed(),
        }
    }
}

#[async_trait]
impl Tool for HealthCheckToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        HealthCheckTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<
        rust_mcp_sdk::schema::CallToolResult,
        rust_mcp_sdk::schema::CallToolError,
    > {
        let params: HealthCheckTool = parse_args("health_check", arguments)?;

        let check_type = params.check_type.unwrap_or_else(|| "all".to_string());
        let verbose = params.verbose.unwrap_or(false);

        let health_status = self.perform_checks(&check_type, verbose).await;

        let content = if verbose {
            serde_json::to_string_pretty(&health_status).map_err(|e| {
                rust_mcp_sdk::schema::CallToolError::from_message(format!("JSON 序列化失败: {e}"))
            })?
        } else {
            use std::fmt::Write;
            let mut summary = format!(
                "状态: {}\n运行时间: {:.2?}\n时间戳: {}",
                health_status.status, health_status.uptime, health_status.timestamp
            );

            if !health_status.checks.is_empty() {
                summary.push_str("\n\n检查结果:");
                for check in &health_status.checks {
                    let _ = write!(
                        summary,
                        "\n- {}: {} ({}ms)",
                        check.name, check.status, check.duration_ms
                    );
                    if let Some(ref msg) = check.message {
                        let _ = write!(summary, " - {msg}");
                    }
                    if let Some(ref err) = check.error {
                        let _ = write!(summary, " [错误: {err}]");
                    }
                }
            }

            summary
        };

        Ok(rust_mcp_sdk::schema::CallToolResult::text_content(vec![
            content.into(),
        ]))
    }
}
