//! Per-user conversation history and lightweight intent detection.
//!
//! Turns are append-only and partitioned by user; readers get the most recent
//! window in insertion order.

mod error;
mod intent;
mod store;

pub use error::{ContextError, ContextErrorKind};
pub use intent::{Intent, detect_intent};
pub use store::{ContextFuture, ConversationStore, InMemoryConversationStore};
