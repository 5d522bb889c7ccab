//! Keyword intent classification for incoming messages.
//!
//! Single keywords match whole words; multi-word phrases match anywhere.
//!
//! ```rust
//! use icontext::{Intent, detect_intent};
//!
//! assert_eq!(detect_intent("Hey IRIS"), Intent::Greeting);
//! assert_eq!(detect_intent("what can you do"), Intent::HelpRequest);
//! assert_eq!(detect_intent("this is a thought"), Intent::GeneralQuery);
//! ```

use std::fmt::{Display, Formatter};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    HelpRequest,
    TimeQuery,
    WeatherQuery,
    Farewell,
    GeneralQuery,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::HelpRequest => "help_request",
            Self::TimeQuery => "time_query",
            Self::WeatherQuery => "weather_query",
            Self::Farewell => "farewell",
            Self::GeneralQuery => "general_query",
        }
    }
}

impl Display for Intent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Checked in order; the first match wins.
const RULES: [(Intent, &[&str]); 5] = [
    (Intent::Greeting, &["hello", "hi", "hey"]),
    (Intent::HelpRequest, &["help", "what can you do"]),
    (Intent::TimeQuery, &["time", "date"]),
    (Intent::WeatherQuery, &["weather"]),
    (Intent::Farewell, &["bye", "goodbye"]),
];

pub fn detect_intent(message: &str) -> Intent {
    let lower = message.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();

    let hit = |keyword: &str| {
        if keyword.contains(' ') {
            lower.contains(keyword)
        } else {
            words.contains(&keyword)
        }
    };

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| hit(keyword)))
        .map_or(Intent::GeneralQuery, |(intent, _)| *intent)
}
