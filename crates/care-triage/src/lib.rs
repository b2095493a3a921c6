//! Keyword triage and the `HealthcareAssistant`.

mod assistant;
mod catalog;

pub use assistant::{HealthcareAssistant, MAX_GENERATOR_WORDS};
pub use catalog::{
    canned_response, classify, quick_tips, CONTEXT_DISCLAIMER, EMERGENCY_PHRASES,
    GENERATOR_FAILED_REPLY, GENERATOR_UNAVAILABLE_REPLY,
};
pub use care_types::{AssistantError, AssistantReply, ChatAssistant, Intent};
