//! Tracing-based routing hooks.
//!
//! ```rust
//! use iobserve::TracingRoutingHooks;
//! use irouter::RoutingHooks;
//!
//! fn accepts_routing_hooks(_hooks: &dyn RoutingHooks) {}
//!
//! accepts_routing_hooks(&TracingRoutingHooks);
//! ```

use std::time::Duration;

use icommon::UserId;
use iprovider::{ProviderError, ProviderId};
use irouter::{RoutingHooks, RoutingStrategy, StatusTransition};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRoutingHooks;

impl RoutingHooks for TracingRoutingHooks {
    fn on_provider_selected(&self, provider: ProviderId, strategy: RoutingStrategy) {
        tracing::info!(
            phase = "routing",
            event = "provider_selected",
            provider = %provider,
            strategy = %strategy
        );
    }

    fn on_empty_pool(&self, last_resort: ProviderId) {
        tracing::warn!(
            phase = "routing",
            event = "empty_pool",
            provider = %last_resort
        );
    }

    fn on_dispatch_start(&self, provider: ProviderId, user_id: &UserId) {
        tracing::debug!(
            phase = "dispatch",
            event = "start",
            provider = %provider,
            user_id = %user_id
        );
    }

    fn on_dispatch_success(&self, provider: ProviderId, elapsed: Duration) {
        tracing::info!(
            phase = "dispatch",
            event = "success",
            provider = %provider,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_dispatch_failure(&self, provider: ProviderId, error: &ProviderError, elapsed: Duration) {
        tracing::error!(
            phase = "dispatch",
            event = "failure",
            provider = %provider,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_status_change(&self, transition: &StatusTransition) {
        tracing::warn!(
            phase = "health",
            event = "status_change",
            provider = %transition.provider,
            from = %transition.from,
            to = %transition.to
        );
    }

    fn on_fallback_attempt(&self, failed: ProviderId, next: ProviderId) {
        tracing::warn!(
            phase = "routing",
            event = "fallback_attempt",
            provider = %next,
            failed = %failed
        );
    }

    fn on_degraded(&self, failed: ProviderId, attempts: usize) {
        tracing::error!(
            phase = "routing",
            event = "degraded",
            provider = %failed,
            attempts
        );
    }
}
