//! Port interfaces for the application layer
//!
//! Ports define the contract between the protocol logic (gateway, client,
//! fetcher) and the infrastructure that talks to the ledger node, stores
//! cached content and delivers notifications. Keeping them here lets the
//! application crate be tested against in-memory fakes.

mod clock;
mod content_cache;
mod rate_limit;
mod read_only_call;

pub use clock::*;
pub use content_cache::{CacheKey, CacheNamespace, ContentCachePort};
pub use rate_limit::{RateLimitEvent, RateLimitEventPort};
pub use read_only_call::{ReadOnlyCall, ReadOnlyCallPort};
