//! HTTP client for an OpenAI-compatible chat-completion API.

use async_trait::async_trait;
use care_types::{GeneratorError, ResponseGenerator};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly healthcare assistant. \
Answer briefly and in plain language. Do not diagnose; encourage the user to consult \
a healthcare professional for medical decisions.";

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_TOKENS: u32 = 100;

/// Message for the chat-completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    pub content: String,
}

impl Message {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Generator backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    system_prompt: String,
}

impl OpenAiGenerator {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.7,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Create from environment variables. Returns `None` when `LLM_API_KEY` is unset.
    /// `LLM_SYSTEM_PROMPT` replaces [`DEFAULT_SYSTEM_PROMPT`] when set and non-blank.
    pub fn from_env() -> Option<Self> {
        let api_url = std::env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_key = std::env::var("LLM_API_KEY").ok()?;
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_tokens = std::env::var("LLM_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let mut gen = Self::new(api_url, api_key, model).with_max_tokens(max_tokens);
        if let Some(prompt) = std::env::var("LLM_SYSTEM_PROMPT")
            .ok()
            .filter(|p| !p.trim().is_empty())
        {
            gen = gen.with_system_prompt(prompt);
        }
        Some(gen)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, input: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message::new("system", &self.system_prompt),
                Message::new("user", input),
            ],
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        }
    }
}

impl fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// First choice's content from a completion body.
fn parse_completion(body: &str) -> Result<String, GeneratorError> {
    let completion: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| GeneratorError::Parse(e.to_string()))?;
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(GeneratorError::Empty)
}

#[async_trait]
impl ResponseGenerator for OpenAiGenerator {
    async fn generate(&self, input: &str) -> Result<String, GeneratorError> {
        let request = self.build_request(input);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeneratorError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GeneratorError::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(GeneratorError::Api(format!(
                "status: {}, body: {}",
                status, body
            )));
        }
        tracing::debug!(model = %self.model, bytes = body.len(), "completion received");
        parse_completion(&body)
    }
}
