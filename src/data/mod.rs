//! 数据集服务模块
//!
//! 四个数据集共用同一条管道：缓存命中直接返回，否则获取 JSON、
//! 解析并执行一次性转换，然后写入缓存。

pub mod books;
pub mod dictionary;
pub mod encyclopedia;
pub mod library;
pub mod links;

use crate::cache::{CacheConfig, Clock, SystemClock, TtlCache};
use crate::config::{AppConfig, SourcesConfig};
use crate::error::{Error, Result};
use crate::fetch::{DatasetSource, HttpFetcher};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use books::Book;
use dictionary::Dictionary;
use encyclopedia::Encyclopedia;
use library::Library;

/// 单个数据集的缓存槽
pub struct DatasetStore<T> {
    name: &'static str,
    url: String,
    cache: TtlCache<T>,
    refresh: tokio::sync::Mutex<()>,
}

impl<T: Send + Sync> DatasetStore<T> {
    /// 创建数据集缓存槽
    pub fn new(
        name: &'static str,
        url: impl Into<String>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            name,
            url: url.into(),
            cache: TtlCache::with_clock(ttl, clock),
            refresh: tokio::sync::Mutex::new(()),
        }
    }

    /// 命中缓存则直接返回，否则获取、转换并缓存
    ///
    /// 同一时刻只有一个调用者执行获取，其余调用者等待后复用其结果。
    pub async fn get_or_fetch<F>(&self, source: &dyn DatasetSource, load: F) -> Result<Arc<T>>
    where
        F: FnOnce(serde_json::Value) -> Result<T> + Send,
    {
        if let Some(hit) = self.cache.get() {
            tracing::debug!("数据集缓存命中: {}", self.name);
            return Ok(hit);
        }

        let _guard = self.refresh.lock().await;
        if let Some(hit) = self.cache.get() {
            return Ok(hit);
        }

        tracing::info!("获取数据集 {}: {}", self.name, self.url);
        let raw = source.fetch_json(&self.url).await?;
        let dataset = load(raw).map_err(|e| match e {
            Error::Json(err) => Error::fetch(&self.url, format!("数据格式无效: {err}")),
            other => other,
        })?;

        Ok(self.cache.set(dataset))
    }

    /// 清空缓存
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// 缓存状态
    pub fn status(&self) -> CacheStatus {
        let remaining = self.cache.remaining();
        CacheStatus {
            dataset: self.name,
            url: self.url.clone(),
            cached: remaining.is_some(),
            expires_in_secs: remaining.map(|left| left.as_secs()),
            ttl_secs: self.cache.ttl().as_secs(),
        }
    }
}

/// 缓存状态
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    /// 数据集名称
    pub dataset: &'static str,
    /// 数据集 URL
    pub url: String,
    /// 是否有未过期的快照
    pub cached: bool,
    /// 剩余有效秒数
    pub expires_in_secs: Option<u64>,
    /// TTL（秒）
    pub ttl_secs: u64,
}

/// 美食数据服务
pub struct FoodService {
    source: Arc<dyn DatasetSource>,
    sources: SourcesConfig,
    dictionary: DatasetStore<Dictionary>,
    books: DatasetStore<Vec<Book>>,
    library: DatasetStore<Library>,
    encyclopedia: DatasetStore<Encyclopedia>,
}

impl FoodService {
    /// 使用系统时钟创建服务
    pub fn new(
        source: Arc<dyn DatasetSource>,
        sources: SourcesConfig,
        cache: &CacheConfig,
    ) -> Self {
        Self::with_clock(source, sources, cache.ttl(), Arc::new(SystemClock))
    }

    /// 使用指定时钟创建服务
    pub fn with_clock(
        source: Arc<dyn DatasetSource>,
        sources: SourcesConfig,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            dictionary: DatasetStore::new(
                "dictionary",
                sources.dictionary.dataset_url.clone(),
                ttl,
                clock.clone(),
            ),
            books: DatasetStore::new(
                "books",
                sources.books.dataset_url.clone(),
                ttl,
                clock.clone(),
            ),
            library: DatasetStore::new(
                "library",
                sources.library.dataset_url.clone(),
                ttl,
                clock.clone(),
            ),
            encyclopedia: DatasetStore::new(
                "encyclopedia",
                sources.encyclopedia.dataset_url.clone(),
                ttl,
                clock,
            ),
            source,
            sources,
        }
    }

    /// 根据应用配置创建基于 HTTP 的服务
    ///
    /// # Errors
    ///
    /// HTTP 客户端构建失败时返回错误
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = crate::utils::HttpClientBuilder::from_config(&config.http).build()?;
        let source: Arc<dyn DatasetSource> = Arc::new(HttpFetcher::new(client));
        Ok(Self::new(source, config.sources.clone(), &config.cache))
    }

    /// 数据源配置
    #[must_use]
    pub fn sources(&self) -> &SourcesConfig {
        &self.sources
    }

    /// 食物词典
    pub async fn dictionary(&self) -> Result<Arc<Dictionary>> {
        self.dictionary
            .get_or_fetch(self.source.as_ref(), Dictionary::from_json)
            .await
    }

    /// 书目列表
    pub async fn books(&self) -> Result<Arc<Vec<Book>>> {
        let config = &self.sources.books;
        self.books
            .get_or_fetch(self.source.as_ref(), |raw| books::load(raw, config))
            .await
    }

    /// 食谱库
    pub async fn library(&self) -> Result<Arc<Library>> {
        let config = &self.sources.library;
        self.library
            .get_or_fetch(self.source.as_ref(), |raw| Library::load(raw, config))
            .await
    }

    /// 美食百科
    pub async fn encyclopedia(&self) -> Result<Arc<Encyclopedia>> {
        let config = &self.sources.encyclopedia;
        let rules = &self.sources.links;
        self.encyclopedia
            .get_or_fetch(self.source.as_ref(), |raw| Encyclopedia::load(raw, config, rules))
            .await
    }

    /// 预热全部数据集，返回失败的数据集名称
    pub async fn warm_up(&self) -> Vec<&'static str> {
        let (dictionary, books, library, encyclopedia) = tokio::join!(
            self.dictionary(),
            self.books(),
            self.library(),
            self.encyclopedia()
        );

        let mut failed = Vec::new();
        for (name, outcome) in [
            ("dictionary", dictionary.err()),
            ("books", books.err()),
            ("library", library.err()),
            ("encyclopedia", encyclopedia.err()),
        ] {
            if let Some(err) = outcome {
                tracing::warn!("预热数据集 {name} 失败: {err}");
                failed.push(name);
            }
        }
        failed
    }

    /// 清空全部缓存
    pub fn clear_all(&self) {
        self.dictionary.clear();
        self.books.clear();
        self.library.clear();
        self.encyclopedia.clear();
    }

    /// 各数据集的缓存状态
    #[must_use]
    pub fn cache_status(&self) -> Vec<CacheStatus> {
        vec![
            self.dictionary.status(),
            self.books.status(),
            self.library.status(),
            self.encyclopedia.status(),
        ]
    }
}

/// JSON 中既可能是字符串也可能是数字的字段（年份、级别等）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// 字符串
    Text(String),
    /// 数字
    Number(serde_json::Number),
    /// 布尔值
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// 分组计数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    /// 分组值
    pub value: String,
    /// 数量
    pub count: usize,
}

/// 按值分组计数，结果按数量降序排列，数量相同时保持首次出现的顺序
pub fn count_by<I>(values: I) -> Vec<CountEntry>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<CountEntry> = Vec::new();

    for value in values {
        if let Some(&i) = index.get(&value) {
            counts[i].count += 1;
        } else {
            index.insert(value.clone(), counts.len());
            counts.push(CountEntry { value, count: 1 });
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// 按原始顺序解析 JSON 对象的键值对
pub(crate) fn ordered_entries<T: DeserializeOwned>(
    value: serde_json::Value,
    what: &str,
) -> Result<Vec<(String, T)>> {
    let serde_json::Value::Object(map) = value else {
        return Err(shape_error(format!("{what} 应为 JSON 对象")));
    };

    map.into_iter()
        .map(|(key, value)| match serde_json::from_value(value) {
            Ok(parsed) => Ok((key, parsed)),
            Err(e) => Err(shape_error(format!("{what} `{key}`: {e}"))),
        })
        .collect()
}

/// 把显式的 JSON `null` 当作缺省值处理
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// 数据格式错误
pub(crate) fn shape_error(message: impl fmt::Display) -> Error {
    Error::Json(<serde_json::Error as serde::de::Error>::custom(message))
}
