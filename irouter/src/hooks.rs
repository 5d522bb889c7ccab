//! Routing lifecycle callbacks.

use std::time::Duration;

use icommon::UserId;
use iprovider::{ProviderError, ProviderId};

use crate::{RoutingStrategy, StatusTransition};

pub trait RoutingHooks: Send + Sync {
    fn on_provider_selected(&self, _provider: ProviderId, _strategy: RoutingStrategy) {}

    fn on_empty_pool(&self, _last_resort: ProviderId) {}

    fn on_dispatch_start(&self, _provider: ProviderId, _user_id: &UserId) {}

    fn on_dispatch_success(&self, _provider: ProviderId, _elapsed: Duration) {}

    fn on_dispatch_failure(
        &self,
        _provider: ProviderId,
        _error: &ProviderError,
        _elapsed: Duration,
    ) {
    }

    fn on_status_change(&self, _transition: &StatusTransition) {}

    fn on_fallback_attempt(&self, _failed: ProviderId, _next: ProviderId) {}

    fn on_degraded(&self, _failed: ProviderId, _attempts: usize) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRoutingHooks;

impl RoutingHooks for NoopRoutingHooks {}
