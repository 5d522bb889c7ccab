//! Fixed-window request quota for a single provider.
//!
//! The window opens on the first consumed request and closes once its length
//! has elapsed; the next check after that starts from zero.
//!
//! ```rust
//! use std::time::{Duration, Instant};
//!
//! use iprovider::RateLimit;
//! use irouter::RateLimiter;
//!
//! let start = Instant::now();
//! let mut limiter = RateLimiter::new(RateLimit::per_minute(1));
//! assert!(limiter.allow(start));
//! limiter.consume(start);
//! assert!(!limiter.allow(start + Duration::from_secs(30)));
//! assert!(limiter.allow(start + Duration::from_secs(61)));
//! ```

use std::time::Instant;

use iprovider::RateLimit;

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiter {
    limit: RateLimit,
    current: u32,
    window_started_at: Option<Instant>,
}

impl RateLimiter {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            current: 0,
            window_started_at: None,
        }
    }

    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn window_started_at(&self) -> Option<Instant> {
        self.window_started_at
    }

    pub fn allow(&mut self, now: Instant) -> bool {
        self.roll_window(now);
        self.current < self.limit.max_requests
    }

    /// Counts one attempt against the quota, whatever its outcome.
    pub fn consume(&mut self, now: Instant) {
        self.roll_window(now);
        if self.window_started_at.is_none() {
            self.window_started_at = Some(now);
        }

        self.current = self.current.saturating_add(1);
    }

    pub fn remaining(&mut self, now: Instant) -> u32 {
        self.roll_window(now);
        self.limit.max_requests.saturating_sub(self.current)
    }

    fn roll_window(&mut self, now: Instant) {
        let Some(started) = self.window_started_at else {
            return;
        };

        if now.saturating_duration_since(started) >= self.limit.window.length() {
            self.current = 0;
            self.window_started_at = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn quota_exhausts_after_max_requests_within_window() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(RateLimit::per_minute(3));

        for offset in 0..3 {
            let now = start + Duration::from_secs(offset);
            assert!(limiter.allow(now));
            limiter.consume(now);
        }

        assert!(!limiter.allow(start + Duration::from_secs(10)));
        assert_eq!(limiter.remaining(start + Duration::from_secs(10)), 0);
    }

    #[test]
    fn counter_resets_once_window_elapses() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(RateLimit::per_minute(2));
        limiter.consume(start);
        limiter.consume(start + Duration::from_secs(30));
        assert!(!limiter.allow(start + Duration::from_secs(59)));

        assert!(limiter.allow(start + Duration::from_secs(60)));
        assert_eq!(limiter.current(), 0);
        assert!(limiter.window_started_at().is_none());
    }

    #[test]
    fn window_is_anchored_to_first_request_not_latest() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(RateLimit::per_minute(5));
        limiter.consume(start);
        limiter.consume(start + Duration::from_secs(50));

        assert_eq!(limiter.window_started_at(), Some(start));

        // 70s after the window opened but only 20s after the last request.
        assert_eq!(limiter.remaining(start + Duration::from_secs(70)), 5);
    }

    #[test]
    fn hourly_window_holds_for_the_full_hour() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(RateLimit::per_hour(1));
        limiter.consume(start);

        assert!(!limiter.allow(start + Duration::from_secs(3599)));
        assert!(limiter.allow(start + Duration::from_secs(3600)));
    }
}
