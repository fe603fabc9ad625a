//! 单槽 TTL 内存缓存

use super::{Clock, SystemClock};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 缓存条目
struct CacheEntry<T> {
    value: Arc<T>,
    stored_at: Instant,
}

/// 单槽 TTL 缓存
///
/// 一次只保存一个数据集快照。`get` 只在 `now - stored_at < ttl` 时返回值，
/// 过期的条目不会被主动清除，而是由下一次 `set` 覆盖。
pub struct TtlCache<T> {
    slot: RwLock<Option<CacheEntry<T>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T> TtlCache<T> {
    /// 使用系统时钟创建缓存
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// 使用指定时钟创建缓存
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
            clock,
        }
    }

    /// 获取未过期的快照
    pub fn get(&self) -> Option<Arc<T>> {
        let slot = self.slot.read();
        slot.as_ref().and_then(|entry| {
            if self.clock.now().saturating_duration_since(entry.stored_at) < self.ttl {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    /// 存入新快照并返回共享句柄
    pub fn set(&self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        let mut slot = self.slot.write();
        *slot = Some(CacheEntry {
            value: value.clone(),
            stored_at: self.clock.now(),
        });
        value
    }

    /// 清空缓存
    pub fn clear(&self) {
        *self.slot.write() = None;
    }

    /// 剩余有效时间，未缓存或已过期时返回 `None`
    pub fn remaining(&self) -> Option<Duration> {
        let slot = self.slot.read();
        slot.as_ref().and_then(|entry| {
            let age = self.clock.now().saturating_duration_since(entry.stored_at);
            self.ttl.checked_sub(age).filter(|left| !left.is_zero())
        })
    }

    /// TTL
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    #[test]
    fn test_get_after_set() {
        let cache = TtlCache::new(Duration::from_secs(300));
        assert!(cache.get().is_none());

        cache.set(vec![1, 2, 3]);
        assert_eq!(cache.get().as_deref(), Some(&vec![1, 2, 3]));

        cache.clear();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_expiry_with_simulated_clock() {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::with_clock(Duration::from_secs(300), clock.clone());

        cache.set("alt");
        clock.advance(Duration::from_secs(299));
        assert_eq!(cache.get().as_deref(), Some(&"alt"));
        assert!(cache.remaining().is_some());

        // 恰好到达 TTL 即视为过期
        clock.advance(Duration::from_secs(1));
        assert!(cache.get().is_none());
        assert!(cache.remaining().is_none());

        cache.set("neu");
        assert_eq!(cache.get().as_deref(), Some(&"neu"));
    }
}
