use serde::Serialize;

/// Emitted when a read-only call is rate limited by the remote node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitEvent {
    pub function_name: String,
    pub contract_id: String,
    pub error: String,
}

/// Rate-limit notification sink. The gateway enforces at most one event per
/// `(function_name, contract_id)` within its cooldown window; publishers do not
/// deduplicate again.
pub trait RateLimitEventPort: Send + Sync {
    fn publish(&self, event: RateLimitEvent);
}
