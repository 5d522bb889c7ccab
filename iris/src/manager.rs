//! Request entry point tying routing to per-user conversation context.
//!
//! ```rust
//! use iris::{HybridIntelligenceManager, OutcomeStatus};
//!
//! # tokio::runtime::Builder::new_current_thread()
//! #     .build()
//! #     .expect("runtime")
//! #     .block_on(async {
//! let manager = HybridIntelligenceManager::builder()
//!     .build()
//!     .expect("default manager");
//!
//! let outcome = manager.process("hello", "u1").await;
//! assert_eq!(outcome.status, OutcomeStatus::Success);
//! assert_eq!(manager.conversation("u1", 10).await.expect("history").len(), 2);
//! # });
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use icommon::{Clock, UserId};
use icontext::{ConversationStore, InMemoryConversationStore, Intent, detect_intent};
use iprovider::{
    CapabilityRegistry, ConversationTurn, ProviderCapability, ProviderId, ProviderRequest,
    ProviderStatus,
};
use irouter::{
    FallbackCoordinator, ProviderRegistry, ProviderStatusEntry, RequestOutcome, RouterError,
    RoutingHooks, RoutingStrategy,
};
use tracing::{info, warn};

use crate::IrisConfig;
use crate::IrisError;
use crate::runtime::{default_capabilities, default_hooks, registry_from_config, system_clock};

/// Outcome plus the classification and context that went with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationReply {
    pub outcome: RequestOutcome,
    pub intent: Intent,
    pub context: Vec<ConversationTurn>,
}

pub struct HybridIntelligenceManager {
    coordinator: FallbackCoordinator,
    store: Arc<dyn ConversationStore>,
    recent_turns: usize,
}

impl HybridIntelligenceManager {
    pub fn builder() -> HybridIntelligenceManagerBuilder {
        HybridIntelligenceManagerBuilder::default()
    }

    /// Routes `message` and records both sides of the exchange. A blank
    /// `user_id` is treated as the default user.
    pub async fn process(&self, message: &str, user_id: impl Into<UserId>) -> RequestOutcome {
        self.handle(message, user_id.into()).await.0
    }

    pub async fn respond(&self, message: &str, user_id: impl Into<UserId>) -> ConversationReply {
        let intent = detect_intent(message);
        let (outcome, context) = self.handle(message, user_id.into()).await;

        ConversationReply {
            outcome,
            intent,
            context,
        }
    }

    pub fn provider_status(&self) -> BTreeMap<ProviderId, ProviderStatusEntry> {
        self.coordinator.registry().status_report()
    }

    pub fn set_routing_strategy(&self, name: &str) -> Result<(), RouterError> {
        let previous = self.coordinator.strategy().set_named(name)?;
        info!(
            phase = "manager",
            event = "strategy_changed",
            from = %previous,
            to = %self.coordinator.strategy().get()
        );
        Ok(())
    }

    pub fn routing_strategy(&self) -> RoutingStrategy {
        self.coordinator.strategy().get()
    }

    pub fn set_provider_status(
        &self,
        provider: ProviderId,
        status: ProviderStatus,
    ) -> Result<(), RouterError> {
        if let Some(transition) = self.coordinator.registry().set_status(provider, status)? {
            info!(
                phase = "manager",
                event = "provider_status_set",
                provider = %provider,
                from = %transition.from,
                to = %transition.to
            );
        }

        Ok(())
    }

    pub async fn conversation(
        &self,
        user_id: impl Into<UserId>,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, IrisError> {
        let user_id = normalize_user(user_id.into());
        Ok(self.store.recent_turns(&user_id, limit).await?)
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        self.coordinator.registry()
    }

    async fn handle(
        &self,
        message: &str,
        user_id: UserId,
    ) -> (RequestOutcome, Vec<ConversationTurn>) {
        let user_id = normalize_user(user_id);
        let context = match self.store.recent_turns(&user_id, self.recent_turns).await {
            Ok(turns) => turns,
            Err(error) => {
                warn!(
                    phase = "manager",
                    event = "context_read_failed",
                    user_id = %user_id,
                    error = %error
                );
                Vec::new()
            }
        };

        let request = ProviderRequest::new(message, user_id.clone()).with_context(context);
        let outcome = self.coordinator.process_with_fallback(&request).await;
        self.record_exchange(&user_id, message, &outcome).await;

        info!(
            phase = "manager",
            event = "processed",
            user_id = %user_id,
            provider = %outcome.provider_used,
            fallback_used = outcome.fallback_used,
            status = ?outcome.status,
            elapsed_ms = outcome.processing_time.as_millis() as u64
        );

        (outcome, request.context)
    }

    async fn record_exchange(&self, user_id: &UserId, message: &str, outcome: &RequestOutcome) {
        let turns = [
            ConversationTurn::user(user_id.clone(), message),
            ConversationTurn::assistant(
                user_id.clone(),
                outcome.response.clone(),
                outcome.provider_used.to_string(),
                outcome.confidence,
            ),
        ];

        for turn in turns {
            if let Err(error) = self.store.append_turn(turn).await {
                warn!(
                    phase = "manager",
                    event = "context_write_failed",
                    user_id = %user_id,
                    error = %error
                );
            }
        }
    }
}

fn normalize_user(user_id: UserId) -> UserId {
    if user_id.is_blank() {
        UserId::default()
    } else {
        user_id
    }
}

pub struct HybridIntelligenceManagerBuilder {
    config: IrisConfig,
    capabilities: Option<CapabilityRegistry>,
    extra_capabilities: Vec<Arc<dyn ProviderCapability>>,
    store: Option<Arc<dyn ConversationStore>>,
    hooks: Option<Arc<dyn RoutingHooks>>,
    clock: Option<Arc<dyn Clock>>,
}

impl Default for HybridIntelligenceManagerBuilder {
    fn default() -> Self {
        Self {
            config: IrisConfig::default(),
            capabilities: None,
            extra_capabilities: Vec::new(),
            store: None,
            hooks: None,
            clock: None,
        }
    }
}

impl HybridIntelligenceManagerBuilder {
    pub fn config(mut self, config: IrisConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default capability set.
    pub fn capabilities(mut self, capabilities: CapabilityRegistry) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Adds or replaces a single capability on top of the base set.
    pub fn capability<P>(mut self, capability: P) -> Self
    where
        P: ProviderCapability + 'static,
    {
        self.extra_capabilities.push(Arc::new(capability));
        self
    }

    pub fn store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn RoutingHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<HybridIntelligenceManager, IrisError> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(system_clock);
        let registry = Arc::new(registry_from_config(&self.config, clock)?);

        let mut capabilities = self.capabilities.unwrap_or_else(default_capabilities);
        for capability in self.extra_capabilities {
            capabilities.register_arc(capability);
        }

        let coordinator = FallbackCoordinator::builder(registry, Arc::new(capabilities))
            .config(self.config.router.clone())
            .hooks(self.hooks.unwrap_or_else(default_hooks))
            .build()?;

        info!(
            phase = "manager",
            event = "initialized",
            strategy = %coordinator.strategy().get(),
            providers = coordinator.registry().ids().len(),
            fallback_enabled = coordinator.fallback_enabled()
        );

        Ok(HybridIntelligenceManager {
            coordinator,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemoryConversationStore::new())),
            recent_turns: self.config.context.recent_turns,
        })
    }
}
