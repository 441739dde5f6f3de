use governor::clock::Clock;
use governor::clock::DefaultClock;
use governor::DefaultKeyedRateLimiter;
use governor::Quota;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Keyed limiters hold at most this many keys before idle ones are dropped.
const RETAIN_THRESHOLD: usize = 1024;

type QuotaKey = (NonZeroU32, Duration);

/// Keyed rate limiters, shared by every request of a process.
///
/// Each distinct `(max_attempts, decay)` pair gets its own keyed limiter:
/// `max_attempts` hits are allowed at once, and one more is replenished
/// every `decay / max_attempts`.
#[derive(Default)]
pub struct RateLimiter {
    limiters: Mutex<HashMap<QuotaKey, Arc<DefaultKeyedRateLimiter<String>>>>,
    clock: DefaultClock,
}
impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a hit against `key`. A zero `decay` never limits.
    pub fn hit(
        &self,
        key: &str,
        max_attempts: NonZeroU32,
        decay: Duration,
    ) -> Result<(), RateLimitError> {
        let Some(quota) = Quota::with_period(decay / max_attempts.get()) else {
            return Ok(());
        };
        let limiter = {
            let mut limiters = self.limiters.lock()
                .map_err(|_| RateLimitError::Poisoned)?;
            limiters.entry((max_attempts, decay))
                .or_insert_with(|| {
                    Arc::new(governor::RateLimiter::keyed(quota.allow_burst(max_attempts)))
                })
                .clone()
        };

        let result = limiter.check_key(&key.to_string());
        if limiter.len() >= RETAIN_THRESHOLD {
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
        result.map_err(|not_until| {
            let wait = not_until.wait_time_from(self.clock.now());
            let retry_after_secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            RateLimitError::Exceeded {
                retry_after_secs: retry_after_secs.max(1),
            }
        })
    }
}
impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let quotas = self.limiters.lock().map(|limiters| limiters.len()).ok();
        f.debug_struct("RateLimiter")
            .field("quotas", &quotas)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum RateLimitError {
    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    Exceeded {
        retry_after_secs: u64,
    },

    #[error("Rate limiter state is poisoned")]
    Poisoned,
}
