//! Routing errors and dispatch failure values.
//!
//! ```rust
//! use irouter::{RouterError, RouterErrorKind};
//!
//! let err = RouterError::invalid_strategy("unknown strategy 'fastest'");
//! assert_eq!(err.kind, RouterErrorKind::InvalidStrategy);
//! assert!(err.to_string().contains("fastest"));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use iprovider::{ProviderError, ProviderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterErrorKind {
    /// No provider is currently eligible. Resolved internally with the last resort.
    EmptyPool,
    InvalidStrategy,
    InvalidConfig,
    UnknownProvider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterError {
    pub kind: RouterErrorKind,
    pub message: String,
}

impl RouterError {
    pub fn new(kind: RouterErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn empty_pool(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::EmptyPool, message)
    }

    pub fn invalid_strategy(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::InvalidStrategy, message)
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::InvalidConfig, message)
    }

    pub fn unknown_provider(provider: ProviderId) -> Self {
        Self::new(
            RouterErrorKind::UnknownProvider,
            format!("provider '{provider}' is not registered"),
        )
    }
}

impl Display for RouterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for RouterError {}

/// A single failed provider attempt. Recovered by the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchError {
    pub provider: ProviderId,
    pub cause: ProviderError,
}

impl DispatchError {
    pub fn new(provider: ProviderId, cause: ProviderError) -> Self {
        Self { provider, cause }
    }
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "dispatch to {} failed: {}", self.provider, self.cause)
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_error_exposes_provider_and_cause() {
        let error = DispatchError::new(
            ProviderId::OpenAiCloud,
            ProviderError::timeout("no answer"),
        );

        assert_eq!(
            error.to_string(),
            "dispatch to openai_cloud failed: Timeout: no answer"
        );
        assert!(error.source().is_some());
    }

    #[test]
    fn unknown_provider_names_the_identity() {
        let error = RouterError::unknown_provider(ProviderId::HuggingFaceCloud);
        assert_eq!(error.kind, RouterErrorKind::UnknownProvider);
        assert!(error.message.contains("huggingface_cloud"));
    }
}
