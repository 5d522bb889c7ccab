//! Router tuning knobs, loadable from the `[router]` table of a config file.

use std::time::Duration;

use iprovider::ProviderId;
use serde::{Deserialize, Serialize};

use crate::{CircuitBreaker, RouterError, RoutingStrategy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub strategy: RoutingStrategy,
    pub fallback_enabled: bool,
    pub error_threshold: u32,
    /// Per-attempt limit. `0` disables the timeout.
    pub dispatch_timeout_ms: u64,
    pub last_resort: ProviderId,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            strategy: RoutingStrategy::Smart,
            fallback_enabled: true,
            error_threshold: CircuitBreaker::DEFAULT_THRESHOLD,
            dispatch_timeout_ms: 30_000,
            last_resort: ProviderId::FallbackLocal,
        }
    }
}

impl RouterConfig {
    pub fn dispatch_timeout(&self) -> Option<Duration> {
        (self.dispatch_timeout_ms > 0).then(|| Duration::from_millis(self.dispatch_timeout_ms))
    }

    pub fn validate(&self) -> Result<(), RouterError> {
        if self.error_threshold == 0 {
            return Err(RouterError::invalid_config(
                "router.error_threshold must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RouterConfig::default();

        assert_eq!(config.strategy, RoutingStrategy::Smart);
        assert!(config.fallback_enabled);
        assert_eq!(config.error_threshold, 3);
        assert_eq!(config.dispatch_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.last_resort, ProviderId::FallbackLocal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = RouterConfig {
            dispatch_timeout_ms: 0,
            ..RouterConfig::default()
        };

        assert_eq!(config.dispatch_timeout(), None);
    }
}
