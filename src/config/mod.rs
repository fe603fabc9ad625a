//! 配置模块

use crate::cache::CacheConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 默认数据主机
pub const DEFAULT_DATA_HOST: &str = "https://www.thai-food-dictionary.de";

/// 默认 Amazon 联盟链接前缀
pub const DEFAULT_AFFILIATE_BASE_URL: &str = "https://www.amazon.de/dp/";

/// 应用程序配置
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,

    /// 缓存配置
    pub cache: CacheConfig,

    /// 日志配置
    pub logging: LoggingConfig,

    /// HTTP 客户端配置
    pub http: HttpConfig,

    /// 数据源配置
    pub sources: SourcesConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务器名称
    pub name: String,

    /// 服务器版本
    pub version: String,

    /// 服务器描述
    pub description: Option<String>,

    /// 主机地址
    pub host: String,

    /// 端口
    pub port: u16,

    /// 传输模式
    pub transport_mode: String,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,

    /// 日志文件路径
    pub file_path: Option<String>,

    /// 是否启用控制台日志（输出到 stderr）
    pub enable_console: bool,

    /// 是否启用文件日志
    pub enable_file: bool,
}

/// HTTP 客户端配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 请求超时（秒），为空时使用传输层默认值
    pub timeout_secs: Option<u64>,

    /// 连接超时（秒）
    pub connect_timeout_secs: u64,

    /// 每个主机的空闲连接数
    pub pool_max_idle_per_host: usize,

    /// 自定义 User-Agent
    pub user_agent: Option<String>,

    /// 是否使用系统代理
    pub use_system_proxy: bool,
}

/// 单个数据集的来源与 URL 改写基址
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SourceConfig {
    /// 数据集 JSON 地址
    pub dataset_url: String,

    /// 站点基址（德语页面，或通用基址）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_base_url: Option<String>,

    /// 英语页面基址，未设置时使用 `site_base_url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_base_url_en: Option<String>,

    /// 图片/媒体基址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,

    /// 联盟推广链接前缀
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_base_url: Option<String>,
}

impl SourceConfig {
    fn dataset(host: &str, path: &str) -> Self {
        Self {
            dataset_url: format!("{host}{path}"),
            site_base_url: None,
            site_base_url_en: None,
            image_base_url: None,
            affiliate_base_url: None,
        }
    }

    /// 站点基址（德语）
    #[must_use]
    pub fn site_base(&self) -> &str {
        self.site_base_url.as_deref().unwrap_or(DEFAULT_DATA_HOST)
    }

    /// 站点基址（英语）
    #[must_use]
    pub fn site_base_en(&self) -> &str {
        self.site_base_url_en
            .as_deref()
            .unwrap_or_else(|| self.site_base())
    }

    /// 图片基址
    #[must_use]
    pub fn image_base(&self) -> &str {
        self.image_base_url.as_deref().unwrap_or_else(|| self.site_base())
    }
}

/// 百科链接改写规则
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LinkRules {
    /// 外部托管内容的内部前缀
    pub external_prefix: String,

    /// 外部托管内容的主机
    pub external_base_url: String,

    /// PDF 资源的内部前缀
    pub pdf_prefix: String,

    /// PDF 资源在主站的路径
    pub pdf_base_url: String,

    /// 视频内容的内部前缀
    pub video_prefix: String,

    /// 视频平台观看地址，视频 id 直接拼接在后面
    pub video_watch_url: String,

    /// Google 翻译代理地址
    pub translate_proxy_url: String,
}

impl Default for LinkRules {
    fn default() -> Self {
        Self {
            external_prefix: "/extern/".to_string(),
            external_base_url: "https://www.thailand-kochbuch.de/".to_string(),
            pdf_prefix: "/pdf/".to_string(),
            pdf_base_url: format!("{DEFAULT_DATA_HOST}/downloads/pdf/"),
            video_prefix: "/video/".to_string(),
            video_watch_url: "https://www.youtube.com/watch?v=".to_string(),
            translate_proxy_url: "https://translate.google.com/translate".to_string(),
        }
    }
}

/// 四个数据集的来源配置
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourcesConfig {
    /// 食物词典
    pub dictionary: SourceConfig,

    /// 书目信息
    pub books: SourceConfig,

    /// 食谱库
    pub library: SourceConfig,

    /// 美食百科
    pub encyclopedia: SourceConfig,

    /// 百科链接规则
    pub links: LinkRules,
}

impl SourcesConfig {
    /// 以指定主机为基准构建默认数据源
    #[must_use]
    pub fn for_host(host: &str) -> Self {
        let host = host.trim_end_matches('/');

        let mut books = SourceConfig::dataset(host, "/data/book-info.json");
        books.affiliate_base_url = Some(DEFAULT_AFFILIATE_BASE_URL.to_string());

        let mut library = SourceConfig::dataset(host, "/data/library.json");
        library.site_base_url = Some(format!("{host}/de"));
        library.site_base_url_en = Some(format!("{host}/en"));
        library.image_base_url = Some(format!("{host}/images/"));

        let mut encyclopedia = SourceConfig::dataset(host, "/data/encyclopedia.json");
        encyclopedia.site_base_url = Some(host.to_string());
        encyclopedia.image_base_url = Some(format!("{host}/media/"));

        Self {
            dictionary: SourceConfig::dataset(host, "/data/dictionary.json"),
            books,
            library,
            encyclopedia,
            links: LinkRules {
                pdf_base_url: format!("{host}/downloads/pdf/"),
                ..LinkRules::default()
            },
        }
    }

    /// 全部数据集 URL（按 dictionary、books、library、encyclopedia 顺序）
    #[must_use]
    pub fn dataset_urls(&self) -> [&str; 4] {
        [
            self.dictionary.dataset_url.as_str(),
            self.books.dataset_url.as_str(),
            self.library.dataset_url.as_str(),
            self.encyclopedia.dataset_url.as_str(),
        ]
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self::for_host(DEFAULT_DATA_HOST)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "thai-food-mcp".to_string(),
            version: crate::VERSION.to_string(),
            description: Some("泰国美食数据 MCP 服务器".to_string()),
            host: "127.0.0.1".to_string(),
            port: 8080,
            transport_mode: "stdio".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: Some("./logs/thai-food-mcp.log".to_string()),
            enable_console: true,
            enable_file: false,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(30),
            connect_timeout_secs: 10,
            pool_max_idle_per_host: 10,
            user_agent: None,
            use_system_proxy: true,
        }
    }
}

impl AppConfig {
    /// 从文件加载配置
    ///
    /// # Errors
    ///
    /// 如果文件不存在、无法读取或格式无效，返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, crate::error::Error> {
        let content = fs::read_to_string(path)
            .map_err(|e| crate::error::Error::Config(format!("读取配置文件失败: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::error::Error::Config(format!("解析配置文件失败: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    ///
    /// # Errors
    ///
    /// 如果无法序列化配置、创建目录或写入文件，返回错误
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), crate::error::Error> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::Error::Config(format!("序列化配置失败: {e}")))?;

        // 确保目录存在
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .map_err(|e| crate::error::Error::Config(format!("创建目录失败: {e}")))?;
        }

        fs::write(path, content)
            .map_err(|e| crate::error::Error::Config(format!("写入配置文件失败: {e}")))?;

        Ok(())
    }

    /// 验证配置
    ///
    /// # Errors
    ///
    /// 如果配置无效（如空主机名、无效端口、无效数据集地址等），返回错误
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.server.host.is_empty() {
            return Err(crate::error::Error::Config("服务器主机不能为空".to_string()));
        }

        if self.server.port == 0 {
            return Err(crate::error::Error::Config("服务器端口不能为0".to_string()));
        }

        let valid_modes = ["stdio", "http", "sse", "hybrid"];
        if !valid_modes.contains(&self.server.transport_mode.as_str()) {
            return Err(crate::error::Error::Config(format!(
                "无效的传输模式: {}，有效值: {:?}",
                self.server.transport_mode, valid_modes
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(crate::error::Error::Config(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        if self.cache.ttl_secs == 0 {
            return Err(crate::error::Error::Config("缓存 TTL 不能为0".to_string()));
        }

        for dataset_url in self.sources.dataset_urls() {
            let parsed = url::Url::parse(dataset_url).map_err(|e| {
                crate::error::Error::Config(format!("无效的数据集地址 {dataset_url}: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(crate::error::Error::Config(format!(
                    "数据集地址必须使用 http(s): {dataset_url}"
                )));
            }
        }

        Ok(())
    }

    /// 从环境变量加载配置
    ///
    /// # Errors
    ///
    /// 如果环境变量格式无效或配置验证失败，返回错误
    pub fn from_env() -> Result<Self, crate::error::Error> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// 用环境变量覆盖当前配置
    ///
    /// # Errors
    ///
    /// 如果数值型环境变量无法解析，返回错误
    pub fn apply_env(&mut self) -> Result<(), crate::error::Error> {
        if let Ok(name) = std::env::var("THAI_FOOD_NAME") {
            self.server.name = name;
        }

        if let Ok(host) = std::env::var("THAI_FOOD_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("THAI_FOOD_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| crate::error::Error::Config(format!("无效的端口: {e}")))?;
        }

        if let Ok(mode) = std::env::var("THAI_FOOD_TRANSPORT_MODE") {
            self.server.transport_mode = mode;
        }

        if let Ok(level) = std::env::var("THAI_FOOD_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(ttl) = std::env::var("THAI_FOOD_CACHE_TTL_SECS") {
            self.cache.ttl_secs = ttl
                .parse()
                .map_err(|e| crate::error::Error::Config(format!("无效的缓存 TTL: {e}")))?;
        }

        if let Ok(host) = std::env::var("THAI_FOOD_DATA_BASE_URL") {
            self.sources = SourcesConfig::for_host(&host);
        }

        Ok(())
    }
}
