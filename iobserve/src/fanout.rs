use std::time::Duration;

use icommon::UserId;
use iprovider::{ProviderError, ProviderId};
use irouter::{RoutingHooks, RoutingStrategy, StatusTransition};

/// Forwards every callback to `first`, then `second`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanoutRoutingHooks<A, B> {
    first: A,
    second: B,
}

impl<A, B> FanoutRoutingHooks<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> RoutingHooks for FanoutRoutingHooks<A, B>
where
    A: RoutingHooks,
    B: RoutingHooks,
{
    fn on_provider_selected(&self, provider: ProviderId, strategy: RoutingStrategy) {
        self.first.on_provider_selected(provider, strategy);
        self.second.on_provider_selected(provider, strategy);
    }

    fn on_empty_pool(&self, last_resort: ProviderId) {
        self.first.on_empty_pool(last_resort);
        self.second.on_empty_pool(last_resort);
    }

    fn on_dispatch_start(&self, provider: ProviderId, user_id: &UserId) {
        self.first.on_dispatch_start(provider, user_id);
        self.second.on_dispatch_start(provider, user_id);
    }

    fn on_dispatch_success(&self, provider: ProviderId, elapsed: Duration) {
        self.first.on_dispatch_success(provider, elapsed);
        self.second.on_dispatch_success(provider, elapsed);
    }

    fn on_dispatch_failure(&self, provider: ProviderId, error: &ProviderError, elapsed: Duration) {
        self.first.on_dispatch_failure(provider, error, elapsed);
        self.second.on_dispatch_failure(provider, error, elapsed);
    }

    fn on_status_change(&self, transition: &StatusTransition) {
        self.first.on_status_change(transition);
        self.second.on_status_change(transition);
    }

    fn on_fallback_attempt(&self, failed: ProviderId, next: ProviderId) {
        self.first.on_fallback_attempt(failed, next);
        self.second.on_fallback_attempt(failed, next);
    }

    fn on_degraded(&self, failed: ProviderId, attempts: usize) {
        self.first.on_degraded(failed, attempts);
        self.second.on_degraded(failed, attempts);
    }
}
