//! Picks one provider out of an eligible set under a routing strategy.
//!
//! Selection is a pure function of its inputs. Every strategy breaks ties by
//! lower priority and then by `ProviderId` order.
//!
//! ```rust
//! use std::collections::HashSet;
//!
//! use iprovider::{ProviderId, ProviderRequest};
//! use irouter::{ProviderRegistry, RoutingStrategy, Selector};
//!
//! let registry = ProviderRegistry::with_defaults();
//! let eligible = registry.list_eligible(&HashSet::new()).expect("defaults are available");
//! let request = ProviderRequest::new("hello", "u1");
//!
//! let chosen = Selector::new(RoutingStrategy::SpeedFirst)
//!     .select(&eligible, &request)
//!     .expect("non-empty pool");
//! assert_eq!(chosen, ProviderId::FallbackLocal);
//! ```

use std::cmp::Ordering;

use iprovider::{ProviderId, ProviderRequest};

use crate::{ProviderSnapshot, RouterError, RoutingStrategy};

/// Messages longer than this lean harder on quality under `smart`.
pub const LONG_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    strategy: RoutingStrategy,
}

impl Selector {
    pub fn new(strategy: RoutingStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> RoutingStrategy {
        self.strategy
    }

    pub fn select(
        &self,
        eligible: &[ProviderSnapshot],
        request: &ProviderRequest,
    ) -> Result<ProviderId, RouterError> {
        let message_chars = request.message_chars();

        eligible
            .iter()
            .min_by(|a, b| self.compare(a, b, message_chars))
            .map(|snapshot| snapshot.id)
            .ok_or_else(|| RouterError::empty_pool("cannot select from an empty provider set"))
    }

    /// `Less` means `a` is preferred.
    fn compare(
        &self,
        a: &ProviderSnapshot,
        b: &ProviderSnapshot,
        message_chars: usize,
    ) -> Ordering {
        let primary = match self.strategy {
            RoutingStrategy::CostFirst => a.cost().total_cmp(&b.cost()),
            RoutingStrategy::SpeedFirst => a.latency().total_cmp(&b.latency()),
            RoutingStrategy::QualityFirst => b.quality().total_cmp(&a.quality()),
            RoutingStrategy::PriorityFirst => Ordering::Equal,
            RoutingStrategy::Smart => {
                smart_score(b, message_chars).total_cmp(&smart_score(a, message_chars))
            }
        };

        primary
            .then_with(|| a.priority().cmp(&b.priority()))
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// Weighted blend of quality, priority, latency, cost, and recent errors.
/// Local providers get a flat bonus; long messages weigh quality again.
/// Never negative.
pub fn smart_score(snapshot: &ProviderSnapshot, message_chars: usize) -> f64 {
    let mut score = snapshot.quality() * 0.4;
    score += (6.0 - f64::from(snapshot.priority())) * 0.1;
    score -= snapshot.latency() * 0.1;
    score -= snapshot.cost() * 10.0;
    score -= f64::from(snapshot.error_count) * 0.05;

    if snapshot.id.is_local() {
        score += 0.2;
    }

    if message_chars > LONG_MESSAGE_CHARS {
        score += snapshot.quality() * 0.2;
    }

    score.max(0.0)
}
