//! Final result of routing one request.

use std::time::Duration;

use iprovider::ProviderId;
use serde::{Serialize, Serializer};

pub const EMERGENCY_FALLBACK: &str = "emergency_fallback";
pub const DEGRADED_CONFIDENCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderUsed {
    Provider(ProviderId),
    /// Every provider failed; the text was produced without one.
    EmergencyFallback,
}

impl ProviderUsed {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provider(id) => id.as_str(),
            Self::EmergencyFallback => EMERGENCY_FALLBACK,
        }
    }

    pub fn provider(self) -> Option<ProviderId> {
        match self {
            Self::Provider(id) => Some(id),
            Self::EmergencyFallback => None,
        }
    }
}

impl std::fmt::Display for ProviderUsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProviderUsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestOutcome {
    pub response: String,
    pub provider_used: ProviderUsed,
    pub confidence: f64,
    #[serde(serialize_with = "as_seconds")]
    pub processing_time: Duration,
    pub fallback_used: bool,
    pub original_provider_failed: Option<ProviderId>,
    pub cost_estimate: f64,
    pub status: OutcomeStatus,
}

impl RequestOutcome {
    /// Answer returned when the whole fallback chain failed.
    pub fn degraded(message: &str, failed: ProviderId, processing_time: Duration) -> Self {
        Self {
            response: degraded_response(message),
            provider_used: ProviderUsed::EmergencyFallback,
            confidence: DEGRADED_CONFIDENCE,
            processing_time,
            fallback_used: true,
            original_provider_failed: Some(failed),
            cost_estimate: 0.0,
            status: OutcomeStatus::Degraded,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.status == OutcomeStatus::Degraded
    }

    pub fn processing_time_seconds(&self) -> f64 {
        self.processing_time.as_secs_f64()
    }
}

pub fn degraded_response(message: &str) -> String {
    format!(
        "I apologize, but I'm experiencing technical difficulties. I understand you said: '{message}'. Please try again in a moment."
    )
}

fn as_seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
