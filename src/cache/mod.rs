//! 缓存模块
//!
//! 提供带 TTL 的单槽内存缓存以及可注入的时钟。

pub mod memory;

use parking_lot::Mutex;
use std::time::{Duration, Instant};

pub use memory::TtlCache;

/// 时钟 trait
pub trait Clock: Send + Sync {
    /// 当前时间
    fn now(&self) -> Instant;
}

/// 系统时钟
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// 手动推进的时钟，用于模拟 TTL 过期
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// 创建新的手动时钟
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// 向前推进时间
    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }
}

/// 缓存配置
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 数据集 TTL（秒）
    pub ttl_secs: u64,

    /// 启动时预热全部数据集
    pub warm_on_start: bool,
}

impl CacheConfig {
    /// TTL 时长
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300, // 5分钟
            warm_on_start: true,
        }
    }
}
