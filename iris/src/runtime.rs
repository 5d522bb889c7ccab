//! Wiring helpers for the default capability set, hooks, and registry.

use std::sync::Arc;

use icommon::{Clock, SystemClock};
use iobserve::{FanoutRoutingHooks, MetricsRoutingHooks, SafeRoutingHooks, TracingRoutingHooks};
#[cfg(feature = "simulated")]
use iprovider::SimulatedProvider;
use iprovider::{CapabilityRegistry, ProviderId, TemplateResponder};
use irouter::{ProviderRegistry, RoutingHooks};

use crate::{HybridIntelligenceManager, IrisConfig, IrisError};

/// One capability per provider identity. The last resort is always the
/// template responder, which cannot fail.
pub fn default_capabilities() -> CapabilityRegistry {
    let mut capabilities = CapabilityRegistry::new();
    register_simulated(&mut capabilities);
    capabilities.register(TemplateResponder::new().with_id(ProviderId::FallbackLocal));
    capabilities
}

#[cfg(feature = "simulated")]
fn register_simulated(capabilities: &mut CapabilityRegistry) {
    for id in ProviderId::all().filter(|id| *id != ProviderId::FallbackLocal) {
        capabilities.register(SimulatedProvider::for_provider(id));
    }
}

#[cfg(not(feature = "simulated"))]
fn register_simulated(_capabilities: &mut CapabilityRegistry) {}

/// Tracing and metrics, isolated from panics.
pub fn default_hooks() -> Arc<dyn RoutingHooks> {
    Arc::new(SafeRoutingHooks::new(FanoutRoutingHooks::new(
        TracingRoutingHooks,
        MetricsRoutingHooks,
    )))
}

pub fn registry_from_config(
    config: &IrisConfig,
    clock: Arc<dyn Clock>,
) -> Result<ProviderRegistry, IrisError> {
    let mut builder = ProviderRegistry::builder()
        .error_threshold(config.router.error_threshold)
        .clock(clock);

    for (id, profile) in config.provider_profiles()? {
        builder = builder.profile(id, profile);
    }

    builder
        .build()
        .map_err(|error| IrisError::config(error.message))
}

pub fn build_manager(config: IrisConfig) -> Result<HybridIntelligenceManager, IrisError> {
    HybridIntelligenceManager::builder().config(config).build()
}

pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "simulated")]
    #[test]
    fn default_capabilities_cover_every_provider() {
        let capabilities = default_capabilities();
        assert_eq!(capabilities.ids(), ProviderId::all().collect::<Vec<_>>());
    }

    #[test]
    fn registry_skips_disabled_providers() {
        let config = IrisConfig::from_toml_str("[providers.openai_cloud]\nenabled = false\n")
            .expect("valid config");
        let registry = registry_from_config(&config, system_clock()).expect("registry");

        assert!(!registry.contains(ProviderId::OpenAiCloud));
        assert!(registry.contains(ProviderId::FallbackLocal));
        assert_eq!(registry.breaker().threshold(), 3);
    }
}
