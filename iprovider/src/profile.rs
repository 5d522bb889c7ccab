//! Static provider metadata: routing profile, rate limits, and lifecycle status.
//!
//! ```rust
//! use iprovider::{ProviderId, ProviderProfile, RateWindow};
//!
//! let openai = ProviderProfile::defaults_for(ProviderId::OpenAiCloud);
//! assert_eq!(openai.priority, 4);
//! let limit = openai.rate_limit.expect("openai is rate limited");
//! assert_eq!(limit.max_requests, 60);
//! assert_eq!(limit.window, RateWindow::PerMinute);
//! assert!(openai.validate().is_ok());
//! ```

use std::fmt::{Display, Formatter};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ProviderError, ProviderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Available,
    Unavailable,
    RateLimited,
    Error,
}

impl Display for ProviderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::RateLimited => "rate_limited",
            Self::Error => "error",
        };

        f.write_str(status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateWindow {
    PerMinute,
    PerHour,
}

impl RateWindow {
    pub fn length(self) -> Duration {
        match self {
            Self::PerMinute => Duration::from_secs(60),
            Self::PerHour => Duration::from_secs(60 * 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window: RateWindow,
}

impl RateLimit {
    pub fn per_minute(max_requests: u32) -> Self {
        Self {
            max_requests,
            window: RateWindow::PerMinute,
        }
    }

    pub fn per_hour(max_requests: u32) -> Self {
        Self {
            max_requests,
            window: RateWindow::PerHour,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Lower is preferred. Starts at 1.
    pub priority: u32,
    pub cost: f64,
    /// Expected response time in seconds.
    pub latency: f64,
    pub quality: f64,
    #[serde(default)]
    pub rate_limit: Option<RateLimit>,
}

impl ProviderProfile {
    pub fn new(priority: u32, cost: f64, latency: f64, quality: f64) -> Self {
        Self {
            priority,
            cost,
            latency,
            quality,
            rate_limit: None,
        }
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn defaults_for(provider: ProviderId) -> Self {
        match provider {
            ProviderId::OllamaLocal => Self::new(1, 0.0, 2.0, 0.85),
            ProviderId::HuggingFaceLocal => Self::new(2, 0.0, 3.0, 0.80),
            ProviderId::HuggingFaceCloud => {
                Self::new(3, 0.0, 1.5, 0.88).with_rate_limit(RateLimit::per_hour(1000))
            }
            ProviderId::OpenAiCloud => {
                Self::new(4, 0.002, 1.2, 0.95).with_rate_limit(RateLimit::per_minute(60))
            }
            ProviderId::FallbackLocal => Self::new(5, 0.0, 0.1, 0.50),
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.priority == 0 {
            return Err(ProviderError::invalid_request("priority must be at least 1"));
        }

        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(ProviderError::invalid_request(
                "cost must be a finite, non-negative number",
            ));
        }

        if !self.latency.is_finite() || self.latency < 0.0 {
            return Err(ProviderError::invalid_request(
                "latency must be a finite, non-negative number of seconds",
            ));
        }

        if !(0.0..=1.0).contains(&self.quality) {
            return Err(ProviderError::invalid_request(
                "quality must be in the inclusive range 0.0..=1.0",
            ));
        }

        if let Some(limit) = self.rate_limit {
            if limit.max_requests == 0 {
                return Err(ProviderError::invalid_request(
                    "rate_limit.max_requests must be greater than zero",
                ));
            }
        }

        Ok(())
    }
}
