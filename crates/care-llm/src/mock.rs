//! Mock generator for tests: scripted replies, no network.

use async_trait::async_trait;
use care_types::{GeneratorError, ResponseGenerator};
use std::sync::atomic::{AtomicUsize, Ordering};

enum Behavior {
    Echo,
    Fixed(String),
    Failing(String),
}

/// Generator that echoes, returns a fixed reply, or always fails. Counts calls.
pub struct MockGenerator {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl MockGenerator {
    /// Replies with "echo: <input>".
    pub fn echo() -> Self {
        Self::with(Behavior::Echo)
    }

    pub fn fixed(reply: impl Into<String>) -> Self {
        Self::with(Behavior::Fixed(reply.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with(Behavior::Failing(message.into()))
    }

    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::echo()
    }
}

#[async_trait]
impl ResponseGenerator for MockGenerator {
    async fn generate(&self, input: &str) -> Result<String, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Echo => Ok(format!("echo: {}", input)),
            Behavior::Fixed(reply) => Ok(reply.clone()),
            Behavior::Failing(msg) => Err(GeneratorError::Api(msg.clone())),
        }
    }
}
