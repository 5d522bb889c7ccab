//! Provider selection, health tracking, and fallback routing.
//!
//! The [`FallbackCoordinator`] reads the current [`RoutingStrategy`], asks the
//! [`ProviderRegistry`] for eligible providers, picks one with the
//! [`Selector`], dispatches through the [`Dispatcher`], and walks the fallback
//! chain on failure. Routing failures never reach the caller; the worst case is
//! a degraded [`RequestOutcome`].
//!
//! ```rust
//! use std::collections::HashSet;
//!
//! use iprovider::ProviderId;
//! use irouter::{ProviderRegistry, RoutingStrategy};
//!
//! let registry = ProviderRegistry::with_defaults();
//! let report = registry.status_report();
//! assert_eq!(report.len(), 5);
//! assert_eq!(report[&ProviderId::OllamaLocal].priority, 1);
//! assert_eq!("smart".parse::<RoutingStrategy>(), Ok(RoutingStrategy::Smart));
//! assert!(registry.list_eligible(&HashSet::new()).is_ok());
//! ```

mod circuit;
mod config;
mod dispatcher;
mod error;
mod fallback;
mod hooks;
mod outcome;
mod rate_limit;
mod registry;
mod selector;
mod state;
mod strategy;

pub mod prelude;

pub use circuit::{CircuitBreaker, StatusTransition};
pub use config::RouterConfig;
pub use dispatcher::{DispatchSuccess, Dispatcher};
pub use error::{DispatchError, RouterError, RouterErrorKind};
pub use fallback::{FallbackCoordinator, FallbackCoordinatorBuilder};
pub use hooks::{NoopRoutingHooks, RoutingHooks};
pub use outcome::{
    DEGRADED_CONFIDENCE, EMERGENCY_FALLBACK, OutcomeStatus, ProviderUsed, RequestOutcome,
    degraded_response,
};
pub use rate_limit::RateLimiter;
pub use registry::{ProviderRegistry, ProviderRegistryBuilder};
pub use selector::{LONG_MESSAGE_CHARS, Selector, smart_score};
pub use state::{ProviderSnapshot, ProviderState, ProviderStatusEntry};
pub use strategy::{RoutingStrategy, StrategyHandle};
