//! Metrics-based routing hooks.
//!
//! Counters are labelled by provider; dispatch latency goes to a histogram.

use std::time::Duration;

use icommon::UserId;
use iprovider::{ProviderError, ProviderId};
use irouter::{RoutingHooks, RoutingStrategy, StatusTransition};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsRoutingHooks;

impl RoutingHooks for MetricsRoutingHooks {
    fn on_provider_selected(&self, provider: ProviderId, strategy: RoutingStrategy) {
        metrics::counter!(
            "iris_provider_selected_total",
            "provider" => provider.to_string(),
            "strategy" => strategy.to_string()
        )
        .increment(1);
    }

    fn on_empty_pool(&self, _last_resort: ProviderId) {
        metrics::counter!("iris_routing_empty_pool_total").increment(1);
    }

    fn on_dispatch_start(&self, provider: ProviderId, _user_id: &UserId) {
        metrics::counter!(
            "iris_dispatch_start_total",
            "provider" => provider.to_string()
        )
        .increment(1);
    }

    fn on_dispatch_success(&self, provider: ProviderId, elapsed: Duration) {
        metrics::counter!(
            "iris_dispatch_success_total",
            "provider" => provider.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "iris_dispatch_duration_seconds",
            "provider" => provider.to_string(),
            "outcome" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_dispatch_failure(&self, provider: ProviderId, error: &ProviderError, elapsed: Duration) {
        metrics::counter!(
            "iris_dispatch_failure_total",
            "provider" => provider.to_string(),
            "error_kind" => format!("{:?}", error.kind),
            "retryable" => error.retryable.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "iris_dispatch_duration_seconds",
            "provider" => provider.to_string(),
            "outcome" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_status_change(&self, transition: &StatusTransition) {
        metrics::counter!(
            "iris_provider_status_change_total",
            "provider" => transition.provider.to_string(),
            "to" => transition.to.to_string()
        )
        .increment(1);
    }

    fn on_fallback_attempt(&self, failed: ProviderId, next: ProviderId) {
        metrics::counter!(
            "iris_fallback_attempt_total",
            "failed" => failed.to_string(),
            "provider" => next.to_string()
        )
        .increment(1);
    }

    fn on_degraded(&self, failed: ProviderId, attempts: usize) {
        metrics::counter!(
            "iris_degraded_total",
            "failed" => failed.to_string()
        )
        .increment(1);
        metrics::histogram!("iris_degraded_attempts").record(attempts as f64);
    }
}
