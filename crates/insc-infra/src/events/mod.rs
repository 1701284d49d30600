//! Rate-limit notification bus.

use insc_core::ports::{RateLimitEvent, RateLimitEventPort};
use tokio::sync::broadcast;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 64;

/// Fans rate-limit events out to any number of subscribers.
///
/// Publishing never blocks. With no subscribers the event is only logged;
/// slow subscribers lose the oldest events once `capacity` is exceeded.
pub struct BroadcastRateLimitBus {
    sender: broadcast::Sender<RateLimitEvent>,
}

impl BroadcastRateLimitBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RateLimitEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastRateLimitBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RateLimitEventPort for BroadcastRateLimitBus {
    fn publish(&self, event: RateLimitEvent) {
        debug!(
            function = %event.function_name,
            contract = %event.contract_id,
            "Broadcasting rate-limit notification"
        );
        if self.sender.send(event).is_err() {
            debug!("No rate-limit subscribers");
        }
    }
}
