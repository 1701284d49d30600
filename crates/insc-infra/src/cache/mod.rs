//! Content cache adapters.
//! 内容缓存适配器。

use std::sync::Arc;

use insc_core::config::CacheConfig;
use insc_core::ports::ContentCachePort;

pub mod fs;
pub mod memory;

pub use fs::FsContentCache;
pub use memory::MemoryContentCache;

/// Disk-backed when `dir` is configured, in-memory otherwise.
pub fn content_cache_from_config(config: &CacheConfig) -> Arc<dyn ContentCachePort> {
    match &config.dir {
        Some(dir) => Arc::new(FsContentCache::new(dir.clone())),
        None => Arc::new(MemoryContentCache::from_config(config)),
    }
}
