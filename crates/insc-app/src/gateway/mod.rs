//! Shared read-only call gateway.
//!
//! One instance per process (or per test tenant). Every remote read goes
//! through [`ReadOnlyGateway::call_with_retry`], which enforces:
//! - a global cap on attempts in flight, admitted in FIFO order
//! - message-based error classification with fail-fast for permanent errors
//! - exponential backoff with jitter, slower once the node rate limits us
//! - at most one rate-limit notification per key and cooldown window
//!
//! Admission is per attempt. A call sleeping between attempts does not hold
//! a slot and rejoins the back of the queue when it retries.

mod backoff;
mod cooldown;

pub use backoff::{backoff_delay, GatewayPolicy, RetryOptions};
pub use cooldown::RateLimitCooldown;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use insc_core::ports::{ClockPort, RateLimitEvent, RateLimitEventPort, SleepPort};
use insc_core::{CallError, ErrorClass};
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Instrument};

use crate::error::GatewayError;

pub struct ReadOnlyGateway {
    policy: GatewayPolicy,
    // tokio's semaphore queues waiters fairly, which gives FIFO admission.
    slots: Semaphore,
    in_flight: AtomicUsize,
    cooldown: RateLimitCooldown,
    events: Arc<dyn RateLimitEventPort>,
    clock: Arc<dyn ClockPort>,
    sleeper: Arc<dyn SleepPort>,
}

impl ReadOnlyGateway {
    pub fn new(
        policy: GatewayPolicy,
        events: Arc<dyn RateLimitEventPort>,
        clock: Arc<dyn ClockPort>,
        sleeper: Arc<dyn SleepPort>,
    ) -> Self {
        Self {
            slots: Semaphore::new(policy.max_in_flight.max(1)),
            in_flight: AtomicUsize::new(0),
            cooldown: RateLimitCooldown::new(policy.cooldown),
            policy,
            events,
            clock,
            sleeper,
        }
    }

    pub fn policy(&self) -> &GatewayPolicy {
        &self.policy
    }

    /// Attempts currently executing.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run `task` (one remote attempt per invocation) under the gateway policy.
    pub async fn call_with_retry<T, F, Fut>(
        &self,
        function_name: &str,
        contract_id: &str,
        options: RetryOptions,
        mut task: F,
    ) -> Result<T, GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        let max_attempts = options
            .max_attempts
            .unwrap_or(self.policy.max_attempts)
            .max(1);
        let base_delay = options.base_delay.unwrap_or(self.policy.base_delay);
        let cancel = options.cancel.as_ref();

        let span = info_span!(
            "gateway.call",
            function = %function_name,
            contract = %contract_id,
        );

        async move {
            let mut attempt: u32 = 0;
            loop {
                if is_cancelled(cancel) {
                    debug!(attempt, "Call cancelled before admission");
                    return Err(GatewayError::Cancelled);
                }

                let result = {
                    let _slot = self.admit(cancel).await?;
                    let _guard = InFlightGuard::enter(&self.in_flight);
                    task().await
                };

                let err = match result {
                    Ok(value) => {
                        debug!(attempt, "Read-only call succeeded");
                        return Ok(value);
                    }
                    Err(err) => err,
                };

                let class = err.classify();
                match class {
                    ErrorClass::Permanent => {
                        warn!(attempt, error = %err, "Read-only call failed permanently");
                        return Err(GatewayError::Permanent { source: err });
                    }
                    ErrorClass::RateLimited => {
                        self.notify_rate_limited(function_name, contract_id, &err);
                    }
                    ErrorClass::Transient => {}
                }

                let attempts_made = attempt + 1;
                if attempts_made >= max_attempts {
                    warn!(
                        attempts = attempts_made,
                        error = %err,
                        "Read-only call exhausted its retry budget"
                    );
                    return Err(GatewayError::Exhausted {
                        attempts: attempts_made,
                        source: err,
                    });
                }

                let delay = backoff_delay(
                    attempt,
                    class == ErrorClass::RateLimited,
                    base_delay,
                    self.policy.rate_limit_floor,
                ) + backoff::sample_jitter(self.policy.jitter);
                debug!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Read-only call failed; retrying"
                );
                self.pause(delay, cancel).await?;
                attempt = attempts_made;
            }
        }
        .instrument(span)
        .await
    }

    async fn admit(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<SemaphorePermit<'_>, GatewayError> {
        let acquire = self.slots.acquire();
        let permit = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(GatewayError::Cancelled),
                permit = acquire => permit,
            },
            None => acquire.await,
        };
        permit.map_err(|_| GatewayError::Closed)
    }

    async fn pause(
        &self,
        delay: Duration,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), GatewayError> {
        match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(GatewayError::Cancelled),
                _ = self.sleeper.sleep(delay) => Ok(()),
            },
            None => {
                self.sleeper.sleep(delay).await;
                Ok(())
            }
        }
    }

    fn notify_rate_limited(&self, function_name: &str, contract_id: &str, err: &CallError) {
        let now_ms = self.clock.now_ms();
        if !self.cooldown.try_acquire(function_name, contract_id, now_ms) {
            debug!("Rate-limit notification suppressed by cooldown");
            return;
        }
        warn!(error = %err, "Remote node is rate limiting read-only calls");
        self.events.publish(RateLimitEvent {
            function_name: function_name.to_string(),
            contract_id: contract_id.to_string(),
            error: err.message().to_string(),
        });
    }
}

fn is_cancelled(cancel: Option<&CancellationToken>) -> bool {
    cancel.is_some_and(CancellationToken::is_cancelled)
}

/// Keeps the in-flight counter right even when the caller drops the future.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
