//! Capability registry mapping provider identities to their implementations.
//!
//! Adding a provider means registering another capability here; routing code
//! never branches on the identity.
//!
//! ```rust
//! use iprovider::{CapabilityRegistry, ProviderId, TemplateResponder};
//!
//! let mut registry = CapabilityRegistry::new();
//! assert!(registry.is_empty());
//!
//! registry.register(TemplateResponder::new());
//! assert!(registry.contains(ProviderId::FallbackLocal));
//! assert_eq!(registry.len(), 1);
//! ```

use std::sync::Arc;

use icommon::Registry;

use crate::{ProviderCapability, ProviderId};

#[derive(Default)]
pub struct CapabilityRegistry {
    capabilities: Registry<ProviderId, Arc<dyn ProviderCapability>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P>(&mut self, capability: P)
    where
        P: ProviderCapability + 'static,
    {
        self.capabilities.insert(capability.id(), Arc::new(capability));
    }

    pub fn register_arc(&mut self, capability: Arc<dyn ProviderCapability>) {
        self.capabilities.insert(capability.id(), capability);
    }

    pub fn get(&self, provider_id: ProviderId) -> Option<Arc<dyn ProviderCapability>> {
        self.capabilities.get(&provider_id).cloned()
    }

    pub fn remove(&mut self, provider_id: ProviderId) -> Option<Arc<dyn ProviderCapability>> {
        self.capabilities.remove(&provider_id)
    }

    pub fn contains(&self, provider_id: ProviderId) -> bool {
        self.capabilities.contains_key(&provider_id)
    }

    /// Registered identities in declaration order.
    pub fn ids(&self) -> Vec<ProviderId> {
        let mut ids: Vec<ProviderId> = self.capabilities.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}
