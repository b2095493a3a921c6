//! In-memory session store (process lifetime only).

use async_trait::async_trait;
use care_types::{ChatTurn, SessionStore, SessionStoreError};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Session histories keyed by session id. With `max_turns`, the oldest exchanges of a
/// session are dropped once it grows past the cap. The cap is at least one exchange.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Vec<ChatTurn>>>,
    max_turns: Option<usize>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_turns: None,
        }
    }

    pub fn with_max_turns(max_turns: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_turns: Some(max_turns.max(2)),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append_exchange(
        &self,
        session_id: &str,
        user_turn: ChatTurn,
        assistant_turn: ChatTurn,
    ) -> Result<usize, SessionStoreError> {
        let mut guard = self.sessions.write().await;
        let turns = guard.entry(session_id.to_string()).or_default();
        turns.push(user_turn);
        turns.push(assistant_turn);
        if let Some(max) = self.max_turns {
            if turns.len() > max {
                // Whole exchanges only.
                let excess = (turns.len() - max).div_ceil(2) * 2;
                turns.drain(..excess);
            }
        }
        Ok(turns.len())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<ChatTurn>, SessionStoreError> {
        let guard = self.sessions.read().await;
        Ok(guard.get(session_id).cloned().unwrap_or_default())
    }

    async fn clear(&self, session_id: &str) -> Result<usize, SessionStoreError> {
        let mut guard = self.sessions.write().await;
        Ok(guard.remove(session_id).map(|t| t.len()).unwrap_or(0))
    }
}
