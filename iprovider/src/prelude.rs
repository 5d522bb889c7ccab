//! Common `iprovider` imports for downstream crates.

pub use crate::{
    CapabilityRegistry, ConversationTurn, ProviderCapability, ProviderError, ProviderErrorKind,
    ProviderFuture, ProviderId, ProviderProfile, ProviderReply, ProviderRequest, ProviderStatus,
    RateLimit, RateWindow, TemplateResponder, TurnRole,
};
pub use icommon::{BoxFuture, UserId};
