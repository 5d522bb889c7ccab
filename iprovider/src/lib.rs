//! Provider identities, routing profiles, and the uniform capability contract.
//!
//! Every backend, local or cloud, sits behind [`ProviderCapability`]; routing
//! code only ever sees identities, profiles, and replies.
//!
//! ```rust
//! use iprovider::{CapabilityRegistry, ProviderId, ProviderProfile, TemplateResponder};
//!
//! let mut capabilities = CapabilityRegistry::new();
//! capabilities.register(TemplateResponder::new());
//!
//! let profile = ProviderProfile::defaults_for(ProviderId::FallbackLocal);
//! assert_eq!(profile.priority, 5);
//! assert!(capabilities.contains(ProviderId::FallbackLocal));
//! ```

mod adapters;
mod error;
mod model;
mod profile;
mod provider;
mod registry;

pub mod prelude;

pub use adapters::TemplateResponder;
#[cfg(feature = "simulated")]
pub use adapters::{SimulatedProvider, contextual_response};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    ConversationTurn, ProviderId, ProviderReply, ProviderRequest, TurnRole, clamp_confidence,
};
pub use profile::{ProviderProfile, ProviderStatus, RateLimit, RateWindow};
pub use provider::{ProviderCapability, ProviderFuture};
pub use registry::CapabilityRegistry;
