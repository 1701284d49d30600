//! # Dependency Injection / 依赖注入模块
//!
//! The only place that depends on insc-infra and insc-app together. Assembly
//! only: no decisions beyond picking adapters from configuration.
//! 仅用于"组装"，不用于"决策"。

use std::sync::Arc;

use insc_app::{ClientDeps, ClientServices, GatewayPolicy};
use insc_core::ClientConfig;
use insc_infra::{
    content_cache_from_config, BroadcastRateLimitBus, StacksApiClient, SystemClock, TokioSleeper,
};

pub struct WiredServices {
    pub services: ClientServices,
    pub rate_limits: Arc<BroadcastRateLimitBus>,
}

pub fn wire_services(config: &ClientConfig) -> anyhow::Result<WiredServices> {
    let remote = Arc::new(StacksApiClient::new(&config.http, config.api_url.clone())?);
    let rate_limits = Arc::new(BroadcastRateLimitBus::default());

    let deps = ClientDeps {
        remote,
        cache: Some(content_cache_from_config(&config.cache)),
        rate_limit_events: rate_limits.clone(),
        clock: Arc::new(SystemClock),
        sleeper: Arc::new(TokioSleeper),
    };

    let services = ClientServices::new(
        deps,
        GatewayPolicy::from(&config.gateway),
        config.sender.clone().unwrap_or_default(),
    );
    Ok(WiredServices {
        services,
        rate_limits,
    })
}
