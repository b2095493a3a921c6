//! Request and response DTOs for the chat API.

use serde::{Deserialize, Serialize};

/// Who wrote a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Label shown next to a message in the chat page.
    pub fn label(self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Assistant => "Assistant",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Speaker::User),
            "assistant" => Some(Speaker::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One message in a session's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub message: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
}

impl ChatTurn {
    pub fn new(speaker: Speaker, message: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            speaker,
            message: message.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// What the triage step decided a message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Emergency,
    Symptom,
    Appointment,
    Medication,
    Pain,
    Fever,
    /// No keyword matched; answered by the response generator.
    Contextual,
}

impl Intent {
    /// Catalog keyword for keyword intents; `None` for `Contextual`.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Intent::Emergency => Some("emergency"),
            Intent::Symptom => Some("symptom"),
            Intent::Appointment => Some("appointment"),
            Intent::Medication => Some("medication"),
            Intent::Pain => Some("pain"),
            Intent::Fever => Some("fever"),
            Intent::Contextual => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.keyword().unwrap_or("contextual")
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reply produced by a `ChatAssistant`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub intent: Intent,
    pub text: String,
}

/// Send-message request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Omitted on the first message; the server assigns one.
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

/// Payload of a successful send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReplyData {
    pub session_id: String,
    pub reply: String,
    pub intent: Intent,
    /// Number of turns stored for the session after this exchange.
    pub history_len: usize,
}

/// Clear-history request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearData {
    pub cleared: usize,
}

/// Base response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    #[serde(default = "default_code")]
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn default_code() -> i32 {
    200
}

impl<T> BaseResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            message: "Success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

pub type ChatResponse = BaseResponse<ChatReplyData>;
pub type HistoryResponse = BaseResponse<Vec<ChatTurn>>;
pub type ClearResponse = BaseResponse<ClearData>;
pub type TipsResponse = BaseResponse<Vec<String>>;
