//! 错误处理模块

use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum Error {
    /// 初始化错误
    #[error("初始化失败: {0}")]
    Initialization(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 数据集获取错误（网络、HTTP 状态、内容类型或 JSON 解析）
    #[error("获取数据集失败 ({url}): {reason}")]
    Fetch {
        /// 数据集 URL
        url: String,
        /// 失败原因
        reason: String,
    },

    /// 请求的键不存在
    #[error("未找到{kind}: {key}{}", format_available(.available))]
    NotFound {
        /// 键的类别（isbn、cookbook、recipe、category ...）
        kind: &'static str,
        /// 请求的键
        key: String,
        /// 可用的键（仅在集合较小时填充）
        available: Vec<String>,
    },

    /// 参数校验错误
    #[error("参数无效: {0}")]
    Validation(String),

    /// MCP 协议错误
    #[error("MCP 协议错误: {0}")]
    Mcp(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    /// URL 解析错误
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),

    /// 其他错误
    #[error("未知错误: {0}")]
    Other(String),
}

impl Error {
    /// 构造数据集获取错误
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// 构造不附带可用键列表的 `NotFound`
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            key: key.into(),
            available: Vec::new(),
        }
    }

    /// 是否属于调用方错误（对应 invalid-params / 4xx）
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::Validation(_))
    }
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!("，可用值: {}", available.join(", "))
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, Error>;

impl From<Box<dyn std::error::Error + Send + Sync>> for Error {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
