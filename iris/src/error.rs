//! Facade-level errors. Provider failures never surface here.

use std::error::Error;
use std::fmt::{Display, Formatter};

use icontext::ContextError;
use irouter::RouterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrisErrorKind {
    Config,
    Router,
    Context,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrisError {
    pub kind: IrisErrorKind,
    pub message: String,
}

impl IrisError {
    pub fn new(kind: IrisErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(IrisErrorKind::Config, message)
    }

    pub fn router(message: impl Into<String>) -> Self {
        Self::new(IrisErrorKind::Router, message)
    }

    pub fn context(message: impl Into<String>) -> Self {
        Self::new(IrisErrorKind::Context, message)
    }
}

impl Display for IrisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for IrisError {}

impl From<RouterError> for IrisError {
    fn from(value: RouterError) -> Self {
        IrisError::router(value.to_string())
    }
}

impl From<ContextError> for IrisError {
    fn from(value: ContextError) -> Self {
        IrisError::context(value.to_string())
    }
}

impl From<toml::de::Error> for IrisError {
    fn from(value: toml::de::Error) -> Self {
        IrisError::config(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_errors_keep_their_message() {
        let error: IrisError = RouterError::invalid_strategy("unknown routing strategy 'x'").into();

        assert_eq!(error.kind, IrisErrorKind::Router);
        assert!(error.message.contains("InvalidStrategy"));
        assert!(error.to_string().starts_with("Router: "));
    }

    #[test]
    fn context_errors_map_to_context_kind() {
        let error: IrisError = ContextError::store("poisoned").into();
        assert_eq!(error.kind, IrisErrorKind::Context);
    }
}
