use std::time::Duration;

use async_trait::async_trait;
use insc_core::ports::SleepPort;

pub struct TokioSleeper;

#[async_trait]
impl SleepPort for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
