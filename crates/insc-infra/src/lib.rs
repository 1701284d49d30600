//! # insc-infra
//!
//! Infrastructure adapters for the inscription client: the node API client,
//! content caches, the rate-limit event bus, time sources and the config loader.

pub mod cache;
pub mod config;
pub mod events;
pub mod stacks;
pub mod time;

pub use cache::{content_cache_from_config, FsContentCache, MemoryContentCache};
pub use config::{load_config, load_config_or_default, ConfigError};
pub use events::BroadcastRateLimitBus;
pub use stacks::{default_api_url, StacksApiClient};
pub use time::{SystemClock, TokioSleeper};
