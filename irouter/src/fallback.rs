//! Select, dispatch, and walk the fallback chain until something answers.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use iprovider::{CapabilityRegistry, ProviderId, ProviderRequest, TemplateResponder};
//! use irouter::{FallbackCoordinator, ProviderRegistry, ProviderUsed};
//!
//! # tokio::runtime::Builder::new_current_thread()
//! #     .build()
//! #     .expect("runtime")
//! #     .block_on(async {
//! let mut capabilities = CapabilityRegistry::new();
//! capabilities.register(TemplateResponder::new());
//!
//! let coordinator = FallbackCoordinator::builder(
//!     Arc::new(ProviderRegistry::with_defaults()),
//!     Arc::new(capabilities),
//! )
//! .build()
//! .expect("last resort is registered");
//!
//! // Only the template capability exists, so the chain ends on it.
//! let outcome = coordinator
//!     .process_with_fallback(&ProviderRequest::new("ping", "u1"))
//!     .await;
//! assert_eq!(outcome.provider_used, ProviderUsed::Provider(ProviderId::FallbackLocal));
//! assert!(outcome.fallback_used);
//! # });
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use iprovider::{CapabilityRegistry, ProviderId, ProviderRequest};

use crate::{
    DispatchSuccess, Dispatcher, NoopRoutingHooks, OutcomeStatus, ProviderRegistry,
    ProviderSnapshot, ProviderUsed, RequestOutcome, RouterConfig, RouterError, RoutingHooks,
    Selector, StrategyHandle,
};

pub struct FallbackCoordinator {
    registry: Arc<ProviderRegistry>,
    dispatcher: Dispatcher,
    strategy: Arc<StrategyHandle>,
    hooks: Arc<dyn RoutingHooks>,
    last_resort: ProviderId,
    fallback_enabled: bool,
}

impl FallbackCoordinator {
    pub fn builder(
        registry: Arc<ProviderRegistry>,
        capabilities: Arc<CapabilityRegistry>,
    ) -> FallbackCoordinatorBuilder {
        FallbackCoordinatorBuilder {
            registry,
            capabilities,
            strategy: None,
            hooks: Arc::new(NoopRoutingHooks),
            config: RouterConfig::default(),
        }
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn strategy(&self) -> &Arc<StrategyHandle> {
        &self.strategy
    }

    pub fn last_resort(&self) -> ProviderId {
        self.last_resort
    }

    pub fn fallback_enabled(&self) -> bool {
        self.fallback_enabled
    }

    /// Never fails: the worst case is a degraded outcome.
    pub async fn process_with_fallback(&self, request: &ProviderRequest) -> RequestOutcome {
        let started = Instant::now();
        let strategy = self.strategy.get();

        let eligible = match self.registry.list_eligible(&HashSet::new()) {
            Ok(eligible) => eligible,
            Err(_) => {
                self.hooks.on_empty_pool(self.last_resort);
                self.registry.get(self.last_resort).into_iter().collect()
            }
        };
        let primary = Selector::new(strategy)
            .select(&eligible, request)
            .unwrap_or(self.last_resort);
        self.hooks.on_provider_selected(primary, strategy);

        if let Ok(success) = self.dispatcher.dispatch(primary, request).await {
            return self.success_outcome(success, None);
        }

        let mut attempts = 1;
        if self.fallback_enabled {
            for next in self.fallback_chain(primary) {
                self.hooks.on_fallback_attempt(primary, next);
                attempts += 1;

                if let Ok(success) = self.dispatcher.dispatch(next, request).await {
                    return self.success_outcome(success, Some(primary));
                }
            }
        }

        self.hooks.on_degraded(primary, attempts);
        RequestOutcome::degraded(&request.message, primary, started.elapsed())
    }

    /// Remaining eligible providers in priority order, ending with the last
    /// resort unless it already failed or is already listed.
    pub fn fallback_chain(&self, failed: ProviderId) -> Vec<ProviderId> {
        let excluded = HashSet::from([failed]);
        let mut candidates: Vec<ProviderSnapshot> =
            self.registry.list_eligible(&excluded).unwrap_or_default();
        candidates.sort_by(|a, b| a.priority().cmp(&b.priority()).then(a.id.cmp(&b.id)));

        let mut chain: Vec<ProviderId> = candidates.into_iter().map(|s| s.id).collect();
        if failed != self.last_resort && !chain.contains(&self.last_resort) {
            chain.push(self.last_resort);
        }

        chain
    }

    fn success_outcome(
        &self,
        success: DispatchSuccess,
        failed: Option<ProviderId>,
    ) -> RequestOutcome {
        let cost_estimate = self
            .registry
            .get(success.provider)
            .map_or(0.0, |snapshot| snapshot.cost());

        RequestOutcome {
            response: success.reply.text,
            provider_used: ProviderUsed::Provider(success.provider),
            confidence: success.reply.confidence,
            processing_time: success.elapsed,
            fallback_used: failed.is_some(),
            original_provider_failed: failed,
            cost_estimate,
            status: OutcomeStatus::Success,
        }
    }
}

pub struct FallbackCoordinatorBuilder {
    registry: Arc<ProviderRegistry>,
    capabilities: Arc<CapabilityRegistry>,
    strategy: Option<Arc<StrategyHandle>>,
    hooks: Arc<dyn RoutingHooks>,
    config: RouterConfig,
}

impl FallbackCoordinatorBuilder {
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares an existing handle instead of creating one from the config.
    pub fn strategy_handle(mut self, strategy: Arc<StrategyHandle>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn RoutingHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn build(self) -> Result<FallbackCoordinator, RouterError> {
        self.config.validate()?;

        let last_resort = self.config.last_resort;
        if !self.registry.contains(last_resort) {
            return Err(RouterError::invalid_config(format!(
                "last resort provider '{last_resort}' has no registry entry"
            )));
        }

        if !self.capabilities.contains(last_resort) {
            return Err(RouterError::invalid_config(format!(
                "last resort provider '{last_resort}' has no registered capability"
            )));
        }

        let strategy = self
            .strategy
            .unwrap_or_else(|| Arc::new(StrategyHandle::new(self.config.strategy)));
        let dispatcher =
            Dispatcher::new(self.capabilities, self.registry.clone(), self.hooks.clone())
                .with_timeout(self.config.dispatch_timeout());

        Ok(FallbackCoordinator {
            registry: self.registry,
            dispatcher,
            strategy,
            hooks: self.hooks,
            last_resort,
            fallback_enabled: self.config.fallback_enabled,
        })
    }
}
