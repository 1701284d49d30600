//! In-memory content cache with bounded size.
//! 具备容量上限的内存内容缓存。

use std::collections::{HashMap, VecDeque};

use anyhow::Result;
use async_trait::async_trait;
use insc_core::config::CacheConfig;
use insc_core::ports::{CacheKey, ContentCachePort};
use tokio::sync::Mutex;

/// Bounded cache for reassembled content, evicted oldest-first.
/// 有界内容缓存，按最早写入顺序驱逐。
pub struct MemoryContentCache {
    inner: Mutex<Inner>,
}

struct Inner {
    entries: HashMap<CacheKey, Vec<u8>>,
    queue: VecDeque<CacheKey>,
    max_entries: usize,
    max_bytes: usize,
    current_bytes: usize,
}

impl MemoryContentCache {
    /// Create a new cache with entry and byte limits.
    /// 创建带有条目数与字节数上限的缓存。
    pub fn new(max_entries: usize, max_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                queue: VecDeque::new(),
                max_entries,
                max_bytes,
                current_bytes: 0,
            }),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries, config.max_bytes)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn current_bytes(&self) -> usize {
        self.inner.lock().await.current_bytes
    }
}

#[async_trait]
impl ContentCachePort for MemoryContentCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let inner = self.inner.lock().await;
        Ok(inner.entries.get(key).cloned())
    }

    async fn set(&self, key: &CacheKey, bytes: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock().await;

        inner.remove_entry(key);
        inner.queue.retain(|queued| queued != key);

        // An entry larger than the whole budget would evict everything and
        // still not fit.
        if bytes.len() > inner.max_bytes {
            return Ok(());
        }

        inner.entries.insert(key.clone(), bytes.to_vec());
        inner.queue.push_back(key.clone());
        inner.current_bytes = inner.current_bytes.saturating_add(bytes.len());

        inner.evict_if_needed();
        Ok(())
    }
}

impl Inner {
    fn remove_entry(&mut self, key: &CacheKey) {
        if let Some(bytes) = self.entries.remove(key) {
            self.current_bytes = self.current_bytes.saturating_sub(bytes.len());
        }
    }

    fn evict_if_needed(&mut self) {
        while self.entries.len() > self.max_entries || self.current_bytes > self.max_bytes {
            match self.queue.pop_front() {
                Some(evicted) => self.remove_entry(&evicted),
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insc_core::ports::CacheNamespace;

    fn key(token_id: u128) -> CacheKey {
        CacheKey::data("SP000000000000000000002Q6VF78.inscriptions", token_id)
    }

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache = MemoryContentCache::new(10, 1_000);
        cache.set(&key(1), &[1, 2, 3]).await.unwrap();

        assert_eq!(cache.get(&key(1)).await.unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(cache.get(&key(2)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_namespaces_are_distinct() {
        let cache = MemoryContentCache::new(10, 1_000);
        cache.set(&key(1), b"data").await.unwrap();
        let preview = CacheKey::new(
            CacheNamespace::Preview,
            "SP000000000000000000002Q6VF78.inscriptions",
            1,
        );
        assert_eq!(cache.get(&preview).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cache_evicts_oldest_by_entries() {
        let cache = MemoryContentCache::new(2, 1_000);
        cache.set(&key(1), &[1]).await.unwrap();
        cache.set(&key(2), &[2]).await.unwrap();
        cache.set(&key(3), &[3]).await.unwrap();

        assert_eq!(cache.get(&key(1)).await.unwrap(), None);
        assert_eq!(cache.get(&key(3)).await.unwrap(), Some(vec![3]));
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_cache_evicts_by_bytes() {
        let cache = MemoryContentCache::new(10, 5);
        cache.set(&key(1), &[0; 3]).await.unwrap();
        cache.set(&key(2), &[0; 3]).await.unwrap();

        assert_eq!(cache.get(&key(1)).await.unwrap(), None);
        assert_eq!(cache.current_bytes().await, 3);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_size_accounting() {
        let cache = MemoryContentCache::new(10, 100);
        cache.set(&key(1), &[0; 40]).await.unwrap();
        cache.set(&key(1), &[0; 10]).await.unwrap();

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.current_bytes().await, 10);
    }

    #[tokio::test]
    async fn test_oversized_entry_is_not_stored() {
        let cache = MemoryContentCache::new(10, 4);
        cache.set(&key(1), &[1, 2]).await.unwrap();
        cache.set(&key(2), &[0; 5]).await.unwrap();

        assert_eq!(cache.get(&key(2)).await.unwrap(), None);
        assert_eq!(cache.get(&key(1)).await.unwrap(), Some(vec![1, 2]));
    }
}
