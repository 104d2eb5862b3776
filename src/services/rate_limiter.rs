// src/services/rate_limiter.rs
use std::{fmt::Debug, num::NonZeroU32, sync::Arc, time::Duration};

use governor::{DefaultKeyedRateLimiter, Quota};

/// Per-client request limiter. `max` requests may be spent at once; the
/// budget then refills evenly over `window`.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Option<Arc<DefaultKeyedRateLimiter<String>>>,
    max: u32,
    window: Duration,
}

impl Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max", &self.max)
            .field("window", &self.window)
            .finish()
    }
}

impl RateLimiter {
    /// `max == 0` disables limiting.
    pub fn new(max: u32, window: Duration) -> Self {
        let inner = NonZeroU32::new(max)
            .and_then(|burst| {
                Quota::with_period(window / max).map(|quota| quota.allow_burst(burst))
            })
            .map(|quota| Arc::new(governor::RateLimiter::keyed(quota)));

        Self { inner, max, window }
    }

    pub fn per_hour(max: u32) -> Self {
        Self::new(max, Duration::from_secs(60 * 60))
    }

    pub fn is_unlimited(&self) -> bool {
        self.inner.is_none()
    }

    /// Count one request for `key` and report whether it is within the limit.
    pub fn allow(&self, key: &str) -> bool {
        match &self.inner {
            Some(limiter) => limiter.check_key(&key.to_string()).is_ok(),
            None => true,
        }
    }

    /// Forget clients whose budget has fully refilled. Returns number removed.
    pub fn purge_expired(&self) -> usize {
        let Some(limiter) = &self.inner else { return 0 };
        let before = limiter.len();
        limiter.retain_recent();
        limiter.shrink_to_fit();
        before.saturating_sub(limiter.len())
    }

    /// Number of tracked clients
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |limiter| limiter.len())
    }
}
