use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Last rate-limit notification per `(function_name, contract_id)`.
///
/// The check and the update happen under one lock, so concurrent failures
/// for the same key admit exactly one notification per window.
#[derive(Debug)]
pub struct RateLimitCooldown {
    window_ms: i64,
    last_emitted: Mutex<HashMap<(String, String), i64>>,
}

impl RateLimitCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: i64::try_from(window.as_millis()).unwrap_or(i64::MAX),
            last_emitted: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` when a notification should be emitted at `now_ms`, and
    /// records it.
    pub fn try_acquire(&self, function_name: &str, contract_id: &str, now_ms: i64) -> bool {
        let mut last_emitted = match self.last_emitted.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let key = (function_name.to_string(), contract_id.to_string());
        if let Some(last) = last_emitted.get(&key) {
            if now_ms.saturating_sub(*last) < self.window_ms {
                return false;
            }
        }
        last_emitted.insert(key, now_ms);
        true
    }
}
