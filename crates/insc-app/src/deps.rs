//! # Client Dependencies / 客户端依赖
//!
//! Parameter grouping for [`ClientServices`](crate::ClientServices)
//! construction. Not a builder: no defaults, no hidden logic.
//! 仅用于参数打包。

use std::sync::Arc;

use insc_core::ports::{
    ClockPort, ContentCachePort, RateLimitEventPort, ReadOnlyCallPort, SleepPort,
};

pub struct ClientDeps {
    // Remote node / 远程节点
    pub remote: Arc<dyn ReadOnlyCallPort>,

    // Cache (optional: absent means every fetch hits the network)
    pub cache: Option<Arc<dyn ContentCachePort>>,

    // Notifications / 通知
    pub rate_limit_events: Arc<dyn RateLimitEventPort>,

    // System / 系统
    pub clock: Arc<dyn ClockPort>,
    pub sleeper: Arc<dyn SleepPort>,
}
