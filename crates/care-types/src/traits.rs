//! Traits for the response generator, the assistant, and history storage.

use crate::{AssistantReply, ChatTurn};
use async_trait::async_trait;
use std::sync::Arc;

/// Produces a free-form reply for text that matched no triage keyword.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, input: &str) -> Result<String, GeneratorError>;
}

#[async_trait]
impl<T: ResponseGenerator + ?Sized> ResponseGenerator for Arc<T> {
    async fn generate(&self, input: &str) -> Result<String, GeneratorError> {
        (**self).generate(input).await
    }
}

#[async_trait]
impl<T: ResponseGenerator + ?Sized> ResponseGenerator for Box<T> {
    async fn generate(&self, input: &str) -> Result<String, GeneratorError> {
        (**self).generate(input).await
    }
}

/// Answers one user message.
#[async_trait]
pub trait ChatAssistant: Send + Sync {
    async fn respond(&self, input: &str) -> Result<AssistantReply, AssistantError>;
}

/// Per-session chat history.
///
/// Contract: `history` returns turns oldest first and an empty list for an unknown
/// session. `append_exchange` stores the user turn and the assistant turn together;
/// no reader observes one without the other. It returns the session's turn count
/// right after the write.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn append_exchange(
        &self,
        session_id: &str,
        user_turn: ChatTurn,
        assistant_turn: ChatTurn,
    ) -> Result<usize, SessionStoreError>;

    async fn history(&self, session_id: &str) -> Result<Vec<ChatTurn>, SessionStoreError>;

    /// Remove all turns of a session; returns how many were removed.
    async fn clear(&self, session_id: &str) -> Result<usize, SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("generator error: {0}")]
    Other(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("empty response")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("message is required")]
    EmptyInput,
    #[error("assistant error: {0}")]
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session store error: {0}")]
    Other(String),
}
