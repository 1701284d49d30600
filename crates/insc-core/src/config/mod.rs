//! # Client Configuration DTO / 客户端配置 DTO
//!
//! Data only: TOML → DTO mapping via serde. Every section and field is
//! optional in the file and falls back to the v1 defaults below.
//! 仅数据结构：缺失的字段使用 v1 默认值。
//!
//! The loader lives in `insc-infra::config`; CLI overrides are applied by the
//! binary after loading.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::contract::Network;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub network: Network,
    /// Node API base URL; the per-network default is used when unset.
    pub api_url: Option<String>,
    /// Principal used as `sender` for read-only calls.
    pub sender: Option<String>,
    /// Protocol version of the target contract, if known.
    pub protocol_version: Option<String>,
    pub gateway: GatewayConfig,
    pub cache: CacheConfig,
    pub http: HttpConfig,
}

/// Read-only call gateway policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub max_in_flight: usize,
    /// Total attempts per call, including the first one.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    /// Minimum base delay once the node has rate limited us.
    pub rate_limit_floor_ms: u64,
    pub jitter_ms: u64,
    /// Window in which repeated rate-limit notifications for one key are dropped.
    pub cooldown_ms: u64,
}

impl Default for GatewayConfig {
    /// v1 默认值（**非常重要：永远保留**）
    fn default() -> Self {
        Self {
            max_in_flight: 3,
            max_attempts: 3,
            base_delay_ms: 500,
            rate_limit_floor_ms: 1_500,
            jitter_ms: 120,
            cooldown_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub max_bytes: usize,
    /// Persist content under this directory instead of in memory.
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            max_bytes: 64 * 1024 * 1024, // 64 MB
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            user_agent: concat!("inscribe/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
