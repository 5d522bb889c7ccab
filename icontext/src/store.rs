//! Conversation storage contracts and a per-user in-memory implementation.
//!
//! ```rust
//! use icontext::{ConversationStore, InMemoryConversationStore};
//! use icommon::UserId;
//! use iprovider::ConversationTurn;
//!
//! # tokio::runtime::Builder::new_current_thread()
//! #     .build()
//! #     .expect("runtime")
//! #     .block_on(async {
//! let store = InMemoryConversationStore::new();
//! store.append_turn(ConversationTurn::user("u1", "hello")).await.expect("append");
//! store.append_turn(ConversationTurn::user("u2", "other user")).await.expect("append");
//!
//! let turns = store.recent_turns(&UserId::from("u1"), 5).await.expect("read");
//! assert_eq!(turns.len(), 1);
//! assert_eq!(turns[0].text, "hello");
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use icommon::{BoxFuture, UserId};
use iprovider::ConversationTurn;

use crate::ContextError;

pub type ContextFuture<'a, T> = BoxFuture<'a, T>;

pub trait ConversationStore: Send + Sync {
    fn append_turn<'a>(
        &'a self,
        turn: ConversationTurn,
    ) -> ContextFuture<'a, Result<(), ContextError>>;

    /// At most `limit` turns for `user_id`, oldest first.
    fn recent_turns<'a>(
        &'a self,
        user_id: &'a UserId,
        limit: usize,
    ) -> ContextFuture<'a, Result<Vec<ConversationTurn>, ContextError>>;

    fn turn_count<'a>(
        &'a self,
        user_id: &'a UserId,
    ) -> ContextFuture<'a, Result<usize, ContextError>>;
}

type Lane = Arc<Mutex<Vec<ConversationTurn>>>;

/// Append-only history with one lock per user, so users never contend with
/// each other once their lane exists.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    lanes: RwLock<HashMap<UserId, Lane>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> Result<Vec<UserId>, ContextError> {
        let lanes = self
            .lanes
            .read()
            .map_err(|_| ContextError::store("conversation lanes lock poisoned"))?;
        let mut users: Vec<UserId> = lanes.keys().cloned().collect();
        users.sort();
        Ok(users)
    }

    fn lane(&self, user_id: &UserId) -> Result<Option<Lane>, ContextError> {
        let lanes = self
            .lanes
            .read()
            .map_err(|_| ContextError::store("conversation lanes lock poisoned"))?;
        Ok(lanes.get(user_id).cloned())
    }

    fn lane_or_insert(&self, user_id: &UserId) -> Result<Lane, ContextError> {
        if let Some(lane) = self.lane(user_id)? {
            return Ok(lane);
        }

        let mut lanes = self
            .lanes
            .write()
            .map_err(|_| ContextError::store("conversation lanes lock poisoned"))?;
        Ok(lanes.entry(user_id.clone()).or_default().clone())
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn append_turn<'a>(
        &'a self,
        turn: ConversationTurn,
    ) -> ContextFuture<'a, Result<(), ContextError>> {
        Box::pin(async move {
            if turn.user_id.is_blank() {
                return Err(ContextError::invalid_request("turn user_id must not be blank"));
            }

            let lane = self.lane_or_insert(&turn.user_id)?;
            let mut turns = lane
                .lock()
                .map_err(|_| ContextError::store("conversation lane lock poisoned"))?;
            turns.push(turn);

            Ok(())
        })
    }

    fn recent_turns<'a>(
        &'a self,
        user_id: &'a UserId,
        limit: usize,
    ) -> ContextFuture<'a, Result<Vec<ConversationTurn>, ContextError>> {
        Box::pin(async move {
            let Some(lane) = self.lane(user_id)? else {
                return Ok(Vec::new());
            };

            let turns = lane
                .lock()
                .map_err(|_| ContextError::store("conversation lane lock poisoned"))?;
            let start = turns.len().saturating_sub(limit);

            Ok(turns[start..].to_vec())
        })
    }

    fn turn_count<'a>(
        &'a self,
        user_id: &'a UserId,
    ) -> ContextFuture<'a, Result<usize, ContextError>> {
        Box::pin(async move {
            let Some(lane) = self.lane(user_id)? else {
                return Ok(0);
            };

            let turns = lane
                .lock()
                .map_err(|_| ContextError::store("conversation lane lock poisoned"))?;
            Ok(turns.len())
        })
    }
}
