//! Common imports for applications built on `iris`.

pub use crate::{
    ConversationReply, HybridIntelligenceManager, IrisConfig, IrisError, IrisErrorKind,
    OutcomeStatus, ProviderCapability, ProviderError, ProviderFuture, ProviderId, ProviderReply,
    ProviderRequest, ProviderStatus, ProviderUsed, RequestOutcome, RouterError, RoutingStrategy,
    UserId, build_manager,
};
