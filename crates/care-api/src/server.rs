//! Axum server and routes.

use crate::render;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use care_types::{
    AssistantError, BaseResponse, ChatAssistant, ChatReplyData, ChatRequest, ChatResponse,
    ChatTurn, ClearData, ClearRequest, ClearResponse, HistoryResponse, SessionStore, Speaker,
    TipsResponse,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

const INDEX_HTML: &str = include_str!("../static/index.html");

pub struct AppState {
    pub assistant: Arc<dyn ChatAssistant + Send + Sync>,
    pub sessions: Arc<dyn SessionStore + Send + Sync>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/chat/send", post(handle_send))
        .route("/chat/history", get(handle_history))
        .route("/chat/transcript", get(handle_transcript))
        .route("/chat/clear", post(handle_clear))
        .route("/chat/tips", get(handle_tips))
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_send(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatResponse> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return Json(bad_body(rejection)),
    };
    let session_id = req
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let asked_at = Utc::now().to_rfc3339();

    let reply = match state.assistant.respond(&req.message).await {
        Ok(reply) => reply,
        Err(AssistantError::EmptyInput) => {
            return Json(BaseResponse::error(400, AssistantError::EmptyInput.to_string()));
        }
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "assistant failed");
            return Json(BaseResponse::error(500, e.to_string()));
        }
    };

    let user_turn = ChatTurn::new(Speaker::User, req.message, asked_at);
    let assistant_turn = ChatTurn::new(Speaker::Assistant, reply.text.clone(), Utc::now().to_rfc3339());
    let history_len = match state
        .sessions
        .append_exchange(&session_id, user_turn, assistant_turn)
        .await
    {
        Ok(n) => n,
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "failed to store exchange");
            return Json(BaseResponse::error(500, e.to_string()));
        }
    };

    tracing::info!(session_id = %session_id, intent = %reply.intent, history_len, "exchange stored");
    Json(BaseResponse::ok(ChatReplyData {
        session_id,
        reply: reply.text,
        intent: reply.intent,
        history_len,
    }))
}

/// Malformed or incomplete JSON bodies still get the envelope, with code 400.
fn bad_body<T>(rejection: JsonRejection) -> BaseResponse<T> {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    BaseResponse::error(400, rejection.body_text())
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

impl SessionQuery {
    fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|s| !s.trim().is_empty())
    }
}

async fn handle_history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SessionQuery>,
) -> Json<HistoryResponse> {
    let Some(session_id) = q.session_id() else {
        return Json(BaseResponse::error(400, "session_id is required"));
    };
    match state.sessions.history(session_id).await {
        Ok(turns) => Json(BaseResponse::ok(turns)),
        Err(e) => Json(BaseResponse::error(500, e.to_string())),
    }
}

async fn handle_transcript(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SessionQuery>,
) -> Html<String> {
    let Some(session_id) = q.session_id() else {
        return Html(String::new());
    };
    match state.sessions.history(session_id).await {
        Ok(turns) => Html(render::render_transcript(&turns)),
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "failed to load transcript");
            Html(String::new())
        }
    }
}

async fn handle_clear(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClearRequest>, JsonRejection>,
) -> Json<ClearResponse> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return Json(bad_body(rejection)),
    };
    if req.session_id.trim().is_empty() {
        return Json(BaseResponse::error(400, "session_id is required"));
    }
    match state.sessions.clear(&req.session_id).await {
        Ok(cleared) => {
            tracing::info!(session_id = %req.session_id, cleared, "history cleared");
            Json(BaseResponse::ok(ClearData { cleared }))
        }
        Err(e) => Json(BaseResponse::error(500, e.to_string())),
    }
}

async fn handle_tips() -> Json<TipsResponse> {
    let tips: Vec<String> = care_triage::quick_tips()
        .iter()
        .map(|t| t.to_string())
        .collect();
    Json(BaseResponse::ok(tips))
}

async fn handle_health() -> &'static str {
    "ok"
}
