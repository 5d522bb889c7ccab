//! Labelled keyword responder standing in for a real model backend.
//!
//! `SimulatedProvider` answers from a small keyword table and never reaches a
//! network. Artificial latency is opt-in so tests and demos stay fast.
//!
//! ```rust
//! use iprovider::{ProviderCapability, ProviderId, SimulatedProvider};
//!
//! let provider = SimulatedProvider::for_provider(ProviderId::OllamaLocal);
//! assert_eq!(provider.id(), ProviderId::OllamaLocal);
//! assert_eq!(provider.label(), "Ollama/Llama3.1");
//! ```

use std::time::Duration;

use chrono::Local;
use futures_timer::Delay;

use crate::{
    ConversationTurn, ProviderCapability, ProviderError, ProviderFuture, ProviderId,
    ProviderReply, ProviderRequest,
};

const GREETING_WORDS: [&str; 4] = ["hello", "hi", "hey", "helo"];
const HELP_PHRASES: [&str; 3] = ["what can you do", "capabilities", "help"];
const ACK_WORDS: [&str; 4] = ["okay", "ok", "good", "fine"];
const WEATHER_WORDS: [&str; 2] = ["weather", "temperature"];
const TIME_WORDS: [&str; 3] = ["time", "date", "clock"];

#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    id: ProviderId,
    label: String,
    confidence: f64,
    latency: Option<Duration>,
}

impl SimulatedProvider {
    pub fn new(id: ProviderId, label: impl Into<String>, confidence: f64) -> Self {
        Self {
            id,
            label: label.into(),
            confidence,
            latency: None,
        }
    }

    pub fn for_provider(id: ProviderId) -> Self {
        match id {
            ProviderId::OllamaLocal => Self::new(id, "Ollama/Llama3.1", 0.85),
            ProviderId::HuggingFaceLocal => Self::new(id, "HF/Local", 0.80),
            ProviderId::HuggingFaceCloud => Self::new(id, "HF/Cloud", 0.88),
            ProviderId::OpenAiCloud => Self::new(id, "OpenAI/GPT-4", 0.95),
            ProviderId::FallbackLocal => Self::new(id, "Fallback/Local", 0.50),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

impl ProviderCapability for SimulatedProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn invoke<'a>(
        &'a self,
        request: &'a ProviderRequest,
    ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>> {
        Box::pin(async move {
            if let Some(latency) = self.latency {
                Delay::new(latency).await;
            }

            let body = contextual_response(&request.message, &request.context);
            Ok(ProviderReply::new(
                format!("[{}] {}", self.label, body),
                self.confidence,
            ))
        })
    }
}

pub fn contextual_response(message: &str, _context: &[ConversationTurn]) -> String {
    if message.contains("नमस्ते") {
        return "नमस्ते! मैं IRIS हूं, आपका बुद्धिमान सहायक। मैं आपकी कैसे मदद कर सकता हूं?"
            .to_string();
    }

    if message.contains("हेलो") {
        return "हैलो! मैं IRIS हूं। आपका स्वागत है!".to_string();
    }

    let lower = message.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    let has_word = |candidates: &[&str]| words.iter().any(|word| candidates.contains(word));

    if has_word(&GREETING_WORDS) {
        return "Hello! I'm IRIS, powered by advanced AI. How can I assist you today?".to_string();
    }

    if HELP_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
        return concat!(
            "I'm IRIS, your intelligent voice assistant! Here's what I can do for you:\n\n",
            "Voice Interaction: Natural speech recognition in multiple languages\n",
            "AI Intelligence: Powered by a hybrid local/cloud AI for optimal performance\n",
            "Web Integration: Search the web and gather information\n",
            "Task Management: Assist with scheduling, reminders, and organization\n",
            "File Processing: Read and analyze documents, PDFs, and text files\n",
            "Multi-language Support: Communicate fluently in English, Hindi, and more\n",
            "Privacy-First: Prioritize local processing to keep your data secure\n\n",
            "Just speak naturally, and I'll understand exactly what you need!"
        )
        .to_string();
    }

    if has_word(&ACK_WORDS) {
        return "Great! Is there anything specific you'd like me to help you with? I'm here and ready to assist!".to_string();
    }

    if has_word(&WEATHER_WORDS) {
        return "I can help with weather information. Weather integration is being enhanced with multiple data sources.".to_string();
    }

    if has_word(&TIME_WORDS) {
        let now = Local::now();
        return format!(
            "The current time is {} on {}. I'm running in hybrid mode for optimal performance.",
            now.format("%H:%M:%S"),
            now.format("%Y-%m-%d")
        );
    }

    format!(
        "I understand you said: '{message}'. I'm processing this using my hybrid intelligence system that combines local privacy with cloud capabilities. How can I help you further?"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_routes_to_expected_answers() {
        assert!(contextual_response("Hey there", &[]).starts_with("Hello! I'm IRIS"));
        assert!(contextual_response("What can you do?", &[]).contains("Voice Interaction"));
        assert!(contextual_response("ok thanks", &[]).starts_with("Great!"));
        assert!(contextual_response("Weather today?", &[]).contains("weather information"));
        assert!(contextual_response("what time is it", &[]).starts_with("The current time is"));
        assert!(contextual_response("नमस्ते", &[]).starts_with("नमस्ते!"));
    }

    #[test]
    fn greeting_words_match_whole_words_only() {
        let answer = contextual_response("this is something else", &[]);
        assert!(answer.starts_with("I understand you said: 'this is something else'"));
    }

    #[tokio::test]
    async fn invoke_prefixes_label_and_uses_fixed_confidence() {
        let provider = SimulatedProvider::for_provider(ProviderId::OpenAiCloud)
            .with_latency(Duration::from_millis(1));
        let request = ProviderRequest::new("hello", "u1");

        let reply = provider.invoke(&request).await.expect("simulated never fails");
        assert!(reply.text.starts_with("[OpenAI/GPT-4] Hello!"));
        assert_eq!(reply.confidence, 0.95);
    }
}
