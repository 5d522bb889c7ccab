//! Consecutive-failure circuit breaker.
//!
//! ```rust
//! use iprovider::{ProviderId, ProviderProfile, ProviderStatus};
//! use irouter::{CircuitBreaker, ProviderState};
//!
//! let breaker = CircuitBreaker::new(2);
//! let mut state = ProviderState::new(
//!     ProviderId::OllamaLocal,
//!     ProviderProfile::defaults_for(ProviderId::OllamaLocal),
//! );
//!
//! assert!(breaker.record_failure(&mut state).is_none());
//! let opened = breaker.record_failure(&mut state).expect("threshold reached");
//! assert_eq!(opened.to, ProviderStatus::Error);
//!
//! let closed = breaker.record_success(&mut state).expect("success restores");
//! assert_eq!(closed.to, ProviderStatus::Available);
//! assert_eq!(state.error_count, 1);
//! ```

use iprovider::{ProviderId, ProviderStatus};

use crate::ProviderState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub provider: ProviderId,
    pub from: ProviderStatus,
    pub to: ProviderStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreaker {
    threshold: u32,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

impl CircuitBreaker {
    pub const DEFAULT_THRESHOLD: u32 = 3;

    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn record_success(&self, state: &mut ProviderState) -> Option<StatusTransition> {
        state.error_count = state.error_count.saturating_sub(1);

        if state.status == ProviderStatus::Error {
            return Some(transition(state, ProviderStatus::Available));
        }

        None
    }

    pub fn record_failure(&self, state: &mut ProviderState) -> Option<StatusTransition> {
        state.error_count = state.error_count.saturating_add(1);

        if state.error_count >= self.threshold && state.status != ProviderStatus::Error {
            return Some(transition(state, ProviderStatus::Error));
        }

        None
    }
}

fn transition(state: &mut ProviderState, to: ProviderStatus) -> StatusTransition {
    let from = state.status;
    state.status = to;

    StatusTransition {
        provider: state.id,
        from,
        to,
    }
}
