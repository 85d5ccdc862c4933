// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request pacing for discovery queries and crawls

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use super::types::SearchError;

const DEFAULT_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(60) {
    Some(n) => n,
    None => unreachable!(),
};

/// Direct (unkeyed) governor limiter shared across tasks
#[derive(Clone)]
pub struct SearchRateLimiter {
    limiter: Arc<GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    period: Duration,
}

impl SearchRateLimiter {
    /// Allow `requests_per_minute` requests; zero falls back to 60
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = NonZeroU32::new(requests_per_minute).unwrap_or(DEFAULT_PER_MINUTE);
        Self {
            limiter: Arc::new(GovRateLimiter::direct(Quota::per_minute(rpm))),
            period: Duration::from_secs(60) / rpm.get(),
        }
    }

    /// One request per `period`, no burst.
    ///
    /// A zero period disables pacing.
    pub fn with_period(period: Duration) -> Self {
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MAX));
        Self {
            limiter: Arc::new(GovRateLimiter::direct(quota)),
            period,
        }
    }

    /// Returns `SearchError::RateLimited` when the budget is spent
    pub fn check(&self) -> Result<(), SearchError> {
        self.limiter
            .check()
            .map_err(|_| SearchError::RateLimited {
                retry_after_secs: self.period.as_secs().max(1),
            })
    }

    /// Wait until a request is allowed
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Interval between replenished requests
    pub fn period(&self) -> Duration {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_rate_limiter_allows_first_request() {
        let limiter = SearchRateLimiter::new(100);
        assert!(limiter.check().is_ok());
    }

    #[test]
    fn test_rate_limiter_zero_becomes_default() {
        let limiter = SearchRateLimiter::new(0);
        assert_eq!(limiter.period(), Duration::from_secs(1));
        assert!(limiter.check().is_ok());
    }

    #[test]
    fn test_rate_limiter_burst_then_limited() {
        let limiter = SearchRateLimiter::new(5);
        for _ in 0..5 {
            assert!(limiter.check().is_ok());
        }
        assert!(matches!(
            limiter.check(),
            Err(SearchError::RateLimited { .. })
        ));
    }

    #[tokio::test]
    async fn test_with_period_spaces_requests() {
        let limiter = SearchRateLimiter::with_period(Duration::from_millis(100));
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_zero_period_does_not_block() {
        let limiter = SearchRateLimiter::with_period(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..10 {
            limiter.wait().await;
        }
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
