//! Hybrid local/cloud request routing with fallback and conversation context.
//!
//! This crate is the single dependency for most applications. It re-exports
//! the workspace crates and wires them into a [`HybridIntelligenceManager`].
//!
//! ```rust
//! use iris::{IrisConfig, build_manager};
//!
//! let config = IrisConfig::from_toml_str("[router]\nstrategy = \"cost_first\"\n")
//!     .expect("valid config");
//! let manager = build_manager(config).expect("manager builds");
//!
//! assert_eq!(manager.routing_strategy().as_str(), "cost_first");
//! assert!(manager.set_routing_strategy("fastest").is_err());
//! assert_eq!(manager.provider_status().len(), 5);
//! ```

mod config;
mod error;
mod manager;

pub mod prelude;
pub mod runtime;

pub use icommon;
pub use icontext;
pub use iobserve;
pub use iprovider;
pub use irouter;

pub use config::{ContextConfig, IrisConfig, ProviderOverride};
pub use error::{IrisError, IrisErrorKind};
pub use manager::{ConversationReply, HybridIntelligenceManager, HybridIntelligenceManagerBuilder};

pub use icommon::{Clock, ManualClock, SystemClock, UserId};
pub use icontext::{
    ContextError, ContextErrorKind, ConversationStore, InMemoryConversationStore, Intent,
    detect_intent,
};
pub use iobserve::{FanoutRoutingHooks, MetricsRoutingHooks, SafeRoutingHooks, TracingRoutingHooks};
#[cfg(feature = "simulated")]
pub use iprovider::SimulatedProvider;
pub use iprovider::{
    CapabilityRegistry, ConversationTurn, ProviderCapability, ProviderError, ProviderErrorKind,
    ProviderFuture, ProviderId, ProviderProfile, ProviderReply, ProviderRequest, ProviderStatus,
    RateLimit, RateWindow, TemplateResponder, TurnRole,
};
pub use irouter::{
    NoopRoutingHooks, OutcomeStatus, ProviderStatusEntry, ProviderUsed, RequestOutcome,
    RouterConfig, RouterError, RouterErrorKind, RoutingHooks, RoutingStrategy,
};

pub use runtime::{build_manager, default_capabilities, default_hooks};
