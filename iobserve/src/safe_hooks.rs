use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use icommon::UserId;
use iprovider::{ProviderError, ProviderId};
use irouter::{RoutingHooks, RoutingStrategy, StatusTransition};

/// Swallows panics raised by the wrapped hooks so routing keeps going.
pub struct SafeRoutingHooks<H> {
    inner: H,
}

impl<H> SafeRoutingHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H> RoutingHooks for SafeRoutingHooks<H>
where
    H: RoutingHooks,
{
    fn on_provider_selected(&self, provider: ProviderId, strategy: RoutingStrategy) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_provider_selected(provider, strategy)
        }));
    }

    fn on_empty_pool(&self, last_resort: ProviderId) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_empty_pool(last_resort)));
    }

    fn on_dispatch_start(&self, provider: ProviderId, user_id: &UserId) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_dispatch_start(provider, user_id)
        }));
    }

    fn on_dispatch_success(&self, provider: ProviderId, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_dispatch_success(provider, elapsed)
        }));
    }

    fn on_dispatch_failure(&self, provider: ProviderId, error: &ProviderError, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_dispatch_failure(provider, error, elapsed)
        }));
    }

    fn on_status_change(&self, transition: &StatusTransition) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_status_change(transition)));
    }

    fn on_fallback_attempt(&self, failed: ProviderId, next: ProviderId) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_fallback_attempt(failed, next)
        }));
    }

    fn on_degraded(&self, failed: ProviderId, attempts: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_degraded(failed, attempts)));
    }
}
