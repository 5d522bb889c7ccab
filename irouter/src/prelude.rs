//! Common `irouter` imports for downstream crates.

pub use crate::{
    DispatchError, FallbackCoordinator, NoopRoutingHooks, OutcomeStatus, ProviderRegistry,
    ProviderSnapshot, ProviderStatusEntry, ProviderUsed, RequestOutcome, RouterConfig,
    RouterError, RouterErrorKind, RoutingHooks, RoutingStrategy, StatusTransition,
    StrategyHandle,
};
