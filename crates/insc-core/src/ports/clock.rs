use std::time::Duration;

pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Suspension point for retry backoff. Swapped for a recording fake in tests.
#[async_trait::async_trait]
pub trait SleepPort: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
