use std::time::Duration;

use insc_core::config::GatewayConfig;
use tokio_util::sync::CancellationToken;

/// Process-wide gateway policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayPolicy {
    pub max_in_flight: usize,
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub rate_limit_floor: Duration,
    pub jitter: Duration,
    pub cooldown: Duration,
}

impl Default for GatewayPolicy {
    fn default() -> Self {
        Self::from(&GatewayConfig::default())
    }
}

impl From<&GatewayConfig> for GatewayPolicy {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            max_in_flight: config.max_in_flight.max(1),
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            rate_limit_floor: Duration::from_millis(config.rate_limit_floor_ms),
            jitter: Duration::from_millis(config.jitter_ms),
            cooldown: Duration::from_millis(config.cooldown_ms),
        }
    }
}

/// Per call-site overrides. Unset fields fall back to the gateway policy.
#[derive(Debug, Clone, Default)]
pub struct RetryOptions {
    pub max_attempts: Option<u32>,
    pub base_delay: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl RetryOptions {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = Some(delay);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Delay before retrying after failed attempt `attempt` (0-based), jitter excluded.
///
/// `max(base, floor if rate limited) × 2^attempt`, saturating.
pub fn backoff_delay(
    attempt: u32,
    rate_limited: bool,
    base_delay: Duration,
    rate_limit_floor: Duration,
) -> Duration {
    let base = if rate_limited {
        base_delay.max(rate_limit_floor)
    } else {
        base_delay
    };
    let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
    base.saturating_mul(factor)
}

/// Uniform jitter in `[0, max)`.
pub(crate) fn sample_jitter(max: Duration) -> Duration {
    use rand::Rng;

    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..max_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Duration = Duration::from_millis(500);
    const FLOOR: Duration = Duration::from_millis(1_500);

    #[test]
    fn delay_doubles_per_attempt() {
        assert_eq!(backoff_delay(0, false, BASE, FLOOR), Duration::from_millis(500));
        assert_eq!(backoff_delay(1, false, BASE, FLOOR), Duration::from_millis(1_000));
        assert_eq!(backoff_delay(2, false, BASE, FLOOR), Duration::from_millis(2_000));
    }

    #[test]
    fn rate_limited_delay_uses_floor() {
        assert_eq!(backoff_delay(0, true, BASE, FLOOR), Duration::from_millis(1_500));
        assert_eq!(backoff_delay(1, true, BASE, FLOOR), Duration::from_millis(3_000));
        // A base above the floor wins.
        assert_eq!(
            backoff_delay(0, true, Duration::from_secs(2), FLOOR),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn huge_attempts_saturate() {
        assert_eq!(backoff_delay(64, false, BASE, FLOOR), BASE.saturating_mul(u32::MAX));
    }

    #[test]
    fn jitter_stays_in_range() {
        let max = Duration::from_millis(120);
        for _ in 0..200 {
            assert!(sample_jitter(max) < max);
        }
        assert_eq!(sample_jitter(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn policy_defaults_follow_config_defaults() {
        let policy = GatewayPolicy::default();
        assert_eq!(policy.max_in_flight, 3);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, BASE);
        assert_eq!(policy.rate_limit_floor, FLOOR);
        assert_eq!(policy.jitter, Duration::from_millis(120));
        assert_eq!(policy.cooldown, Duration::from_secs(30));
    }
}
