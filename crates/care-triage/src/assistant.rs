//! HealthcareAssistant: keyword triage first, response generator as fallback.

use crate::catalog::{
    canned_response, classify, CONTEXT_DISCLAIMER, GENERATOR_FAILED_REPLY,
    GENERATOR_UNAVAILABLE_REPLY,
};
use async_trait::async_trait;
use care_types::{AssistantError, AssistantReply, ChatAssistant, ResponseGenerator};

/// Longest input (in words) forwarded to the generator.
pub const MAX_GENERATOR_WORDS: usize = 512;

/// Assistant that answers keyword intents from the catalog and everything else with `G`.
/// Without a generator, contextual questions get an apology.
pub struct HealthcareAssistant<G> {
    generator: Option<G>,
}

impl<G> HealthcareAssistant<G>
where
    G: ResponseGenerator,
{
    pub fn new(generator: Option<G>) -> Self {
        Self { generator }
    }

    pub fn with_generator(generator: G) -> Self {
        Self::new(Some(generator))
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    async fn contextual_reply(&self, input: &str) -> String {
        let Some(generator) = self.generator.as_ref() else {
            return GENERATOR_UNAVAILABLE_REPLY.to_string();
        };
        let prompt = care_nlp::truncate_words(input.trim(), MAX_GENERATOR_WORDS);
        match generator.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!("generator returned a blank reply");
                GENERATOR_FAILED_REPLY.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "generator failed");
                GENERATOR_FAILED_REPLY.to_string()
            }
        }
    }
}

impl HealthcareAssistant<Box<dyn ResponseGenerator>> {
    /// Assistant with no generator; every contextual question gets the apology reply.
    pub fn without_generator() -> Self {
        Self { generator: None }
    }
}

#[async_trait]
impl<G> ChatAssistant for HealthcareAssistant<G>
where
    G: ResponseGenerator,
{
    async fn respond(&self, input: &str) -> Result<AssistantReply, AssistantError> {
        let pre = care_nlp::preprocess(input);
        if pre.is_empty() {
            return Err(AssistantError::EmptyInput);
        }
        let intent = classify(&pre.normalized);
        tracing::debug!(%intent, "classified message");

        let text = match canned_response(intent) {
            Some(text) => text.to_string(),
            None => {
                let reply = self.contextual_reply(input).await;
                format!("{}{}", reply, CONTEXT_DISCLAIMER)
            }
        };
        Ok(AssistantReply { intent, text })
    }
}
