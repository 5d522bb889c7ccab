//! Mutable per-provider health record and its read-only snapshot.

use std::time::Instant;

use iprovider::{ProviderId, ProviderProfile, ProviderStatus};
use serde::Serialize;

use crate::RateLimiter;

#[derive(Debug, Clone)]
pub struct ProviderState {
    pub id: ProviderId,
    pub status: ProviderStatus,
    pub profile: ProviderProfile,
    pub last_used_at: Option<Instant>,
    pub error_count: u32,
    pub rate_limiter: Option<RateLimiter>,
}

impl ProviderState {
    pub fn new(id: ProviderId, profile: ProviderProfile) -> Self {
        Self {
            id,
            status: ProviderStatus::Available,
            profile,
            last_used_at: None,
            error_count: 0,
            rate_limiter: profile.rate_limit.map(RateLimiter::new),
        }
    }

    /// Rolls the rate window forward as a side effect.
    pub fn rate_allows(&mut self, now: Instant) -> bool {
        self.rate_limiter
            .as_mut()
            .is_none_or(|limiter| limiter.allow(now))
    }

    pub fn is_eligible(&mut self, now: Instant) -> bool {
        self.status == ProviderStatus::Available && self.rate_allows(now)
    }

    pub fn snapshot(&mut self, now: Instant) -> ProviderSnapshot {
        let requests_remaining = self
            .rate_limiter
            .as_mut()
            .map(|limiter| limiter.remaining(now));

        ProviderSnapshot {
            id: self.id,
            status: self.status,
            profile: self.profile,
            error_count: self.error_count,
            last_used_at: self.last_used_at,
            requests_remaining,
        }
    }
}

/// Point-in-time copy of a provider's state, safe to hold across awaits.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSnapshot {
    pub id: ProviderId,
    pub status: ProviderStatus,
    pub profile: ProviderProfile,
    pub error_count: u32,
    pub last_used_at: Option<Instant>,
    pub requests_remaining: Option<u32>,
}

impl ProviderSnapshot {
    pub fn priority(&self) -> u32 {
        self.profile.priority
    }

    pub fn cost(&self) -> f64 {
        self.profile.cost
    }

    pub fn latency(&self) -> f64 {
        self.profile.latency
    }

    pub fn quality(&self) -> f64 {
        self.profile.quality
    }

    /// Status as reported to operators: an available provider with an
    /// exhausted quota reads as `rate_limited`.
    pub fn reported_status(&self) -> ProviderStatus {
        match (self.status, self.requests_remaining) {
            (ProviderStatus::Available, Some(0)) => ProviderStatus::RateLimited,
            (status, _) => status,
        }
    }

    pub fn status_entry(&self) -> ProviderStatusEntry {
        ProviderStatusEntry {
            status: self.reported_status(),
            priority: self.profile.priority,
            quality: self.profile.quality,
            latency: self.profile.latency,
            cost: self.profile.cost,
            error_count: self.error_count,
            requests_remaining: self.requests_remaining,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStatusEntry {
    pub status: ProviderStatus,
    pub priority: u32,
    pub quality: f64,
    pub latency: f64,
    pub cost: f64,
    pub error_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_remaining: Option<u32>,
}
