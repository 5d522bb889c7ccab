//! Provider identity, conversation turns, and the request/reply contract.
//!
//! ```rust
//! use iprovider::{ProviderId, ProviderReply, ProviderRequest};
//!
//! let id: ProviderId = "openai-cloud".parse().expect("known provider");
//! assert_eq!(id, ProviderId::OpenAiCloud);
//! assert!(!id.is_local());
//!
//! let request = ProviderRequest::new("ping", "u1");
//! assert_eq!(request.user_id.as_str(), "u1");
//!
//! let reply = ProviderReply::new("pong", 1.7);
//! assert_eq!(reply.confidence, 1.0);
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::SystemTime;

use icommon::UserId;
use serde::{Deserialize, Serialize};

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "ollama_local")]
    OllamaLocal,
    #[serde(rename = "huggingface_local")]
    HuggingFaceLocal,
    #[serde(rename = "huggingface_cloud")]
    HuggingFaceCloud,
    #[serde(rename = "openai_cloud")]
    OpenAiCloud,
    #[serde(rename = "fallback_local")]
    FallbackLocal,
}

impl ProviderId {
    pub const ALL: [ProviderId; 5] = [
        ProviderId::OllamaLocal,
        ProviderId::HuggingFaceLocal,
        ProviderId::HuggingFaceCloud,
        ProviderId::OpenAiCloud,
        ProviderId::FallbackLocal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OllamaLocal => "ollama_local",
            Self::HuggingFaceLocal => "huggingface_local",
            Self::HuggingFaceCloud => "huggingface_cloud",
            Self::OpenAiCloud => "openai_cloud",
            Self::FallbackLocal => "fallback_local",
        }
    }

    /// On-premise capabilities get a privacy bonus during smart routing.
    pub fn is_local(self) -> bool {
        self.as_str().contains("local")
    }

    pub fn all() -> impl Iterator<Item = ProviderId> {
        Self::ALL.into_iter()
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| ProviderError::invalid_request(format!("unknown provider '{value}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub timestamp: SystemTime,
    pub user_id: UserId,
    pub text: String,
    pub role: TurnRole,
    pub provider_used: Option<String>,
    pub confidence: Option<f64>,
}

impl ConversationTurn {
    pub fn user(user_id: impl Into<UserId>, text: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            user_id: user_id.into(),
            text: text.into(),
            role: TurnRole::User,
            provider_used: None,
            confidence: None,
        }
    }

    pub fn assistant(
        user_id: impl Into<UserId>,
        text: impl Into<String>,
        provider_used: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            timestamp: SystemTime::now(),
            user_id: user_id.into(),
            text: text.into(),
            role: TurnRole::Assistant,
            provider_used: Some(provider_used.into()),
            confidence: Some(confidence),
        }
    }

    pub fn at(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub message: String,
    pub user_id: UserId,
    /// Recent turns for this user, oldest first. Read-only to providers.
    pub context: Vec<ConversationTurn>,
}

impl ProviderRequest {
    pub fn new(message: impl Into<String>, user_id: impl Into<UserId>) -> Self {
        Self {
            message: message.into(),
            user_id: user_id.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Vec<ConversationTurn>) -> Self {
        self.context = context;
        self
    }

    pub fn message_chars(&self) -> usize {
        self.message.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub text: String,
    pub confidence: f64,
}

impl ProviderReply {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence: clamp_confidence(confidence),
        }
    }
}

pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }

    value.clamp(0.0, 1.0)
}
