//! OpenAI-compatible response generator.

#[cfg(feature = "test-util")]
pub mod mock;
mod openai;

pub use care_types::{GeneratorError, ResponseGenerator};
pub use openai::{Message, OpenAiGenerator, DEFAULT_SYSTEM_PROMPT};

#[cfg(feature = "test-util")]
pub use mock::MockGenerator;
