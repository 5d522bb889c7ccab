//! Deterministic template responder used as the last-resort capability.
//!
//! ```rust
//! use iprovider::{ProviderCapability, ProviderId, TemplateResponder};
//!
//! let responder = TemplateResponder::new();
//! assert_eq!(responder.id(), ProviderId::FallbackLocal);
//! ```

use crate::{
    ProviderCapability, ProviderError, ProviderFuture, ProviderId, ProviderReply, ProviderRequest,
};

const TEMPLATES: [&str; 4] = [
    "I understand you're asking about '{message}'. Let me help you with that.",
    "That's an interesting question about '{message}'. Here's what I think...",
    "Regarding '{message}', I can provide some insights.",
    "I see you mentioned '{message}'. Let me assist you.",
];

#[derive(Debug, Clone)]
pub struct TemplateResponder {
    id: ProviderId,
    confidence: f64,
}

impl TemplateResponder {
    pub const DEFAULT_CONFIDENCE: f64 = 0.5;

    pub fn new() -> Self {
        Self {
            id: ProviderId::FallbackLocal,
            confidence: Self::DEFAULT_CONFIDENCE,
        }
    }

    pub fn with_id(mut self, id: ProviderId) -> Self {
        self.id = id;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Same message, same template.
    pub fn render(&self, message: &str) -> String {
        let index = message.chars().count() % TEMPLATES.len();
        TEMPLATES[index].replace("{message}", message)
    }
}

impl Default for TemplateResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderCapability for TemplateResponder {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn invoke<'a>(
        &'a self,
        request: &'a ProviderRequest,
    ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>> {
        Box::pin(async move {
            Ok(ProviderReply::new(
                self.render(&request.message),
                self.confidence,
            ))
        })
    }
}
