//! Integration tests: send, history, clear, transcript, tips, and failure paths.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use care_api::server::{self, AppState};
use care_llm::MockGenerator;
use care_session::{InMemorySessionStore, JsonlSessionStore};
use care_triage::{HealthcareAssistant, CONTEXT_DISCLAIMER, GENERATOR_UNAVAILABLE_REPLY};
use care_types::{ChatAssistant, ChatTurn, SessionStore, SessionStoreError};
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use tower::util::ServiceExt;

fn app_with(
    assistant: Arc<dyn ChatAssistant + Send + Sync>,
    sessions: Arc<dyn SessionStore + Send + Sync>,
) -> axum::Router {
    server::router(Arc::new(AppState {
        assistant,
        sessions,
    }))
}

fn test_app() -> axum::Router {
    app_with(
        Arc::new(HealthcareAssistant::with_generator(MockGenerator::echo())),
        Arc::new(InMemorySessionStore::new()),
    )
}

async fn post_json(app: &axum::Router, uri: &str, body: serde_json::Value) -> serde_json::Value {
    post_raw(app, uri, body.to_string()).await
}

async fn post_raw(app: &axum::Router, uri: &str, body: String) -> serde_json::Value {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn get_text(app: &axum::Router, uri: &str) -> String {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

async fn get_json(app: &axum::Router, uri: &str) -> serde_json::Value {
    serde_json::from_str(&get_text(app, uri).await).unwrap()
}

#[tokio::test]
async fn keyword_message_then_history() {
    let app = test_app();
    let j = post_json(
        &app,
        "/chat/send",
        json!({ "session_id": "s1", "message": "I have a fever" }),
    )
    .await;
    assert_eq!(j["code"], 200);
    assert_eq!(j["data"]["session_id"], "s1");
    assert_eq!(j["data"]["intent"], "fever");
    assert_eq!(j["data"]["history_len"], 2);
    assert!(j["data"]["reply"].as_str().unwrap().contains("stay hydrated"));

    let j = get_json(&app, "/chat/history?session_id=s1").await;
    let turns = j["data"].as_array().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0]["speaker"], "user");
    assert_eq!(turns[0]["message"], "I have a fever");
    assert_eq!(turns[1]["speaker"], "assistant");
}

#[tokio::test]
async fn missing_session_id_is_assigned_and_reused() {
    let app = test_app();
    let j = post_json(&app, "/chat/send", json!({ "message": "Book an appointment" })).await;
    assert_eq!(j["data"]["intent"], "appointment");
    let session_id = j["data"]["session_id"].as_str().unwrap().to_string();
    assert!(!session_id.is_empty());

    let j = post_json(
        &app,
        "/chat/send",
        json!({ "session_id": session_id, "message": "Someone is unconscious!" }),
    )
    .await;
    assert_eq!(j["data"]["intent"], "emergency");
    assert_eq!(j["data"]["history_len"], 4);
}

#[tokio::test]
async fn contextual_message_uses_generator_with_disclaimer() {
    let app = test_app();
    let j = post_json(
        &app,
        "/chat/send",
        json!({ "session_id": "ctx", "message": "Is coffee healthy?" }),
    )
    .await;
    assert_eq!(j["data"]["intent"], "contextual");
    assert_eq!(
        j["data"]["reply"],
        format!("echo: Is coffee healthy?{}", CONTEXT_DISCLAIMER)
    );
}

#[tokio::test]
async fn no_generator_still_answers() {
    let app = app_with(
        Arc::new(HealthcareAssistant::without_generator()),
        Arc::new(InMemorySessionStore::new()),
    );
    let j = post_json(&app, "/chat/send", json!({ "message": "Is coffee healthy?" })).await;
    assert_eq!(j["code"], 200);
    assert!(j["data"]["reply"]
        .as_str()
        .unwrap()
        .starts_with(GENERATOR_UNAVAILABLE_REPLY));
}

#[tokio::test]
async fn empty_message_is_rejected_and_not_stored() {
    let app = test_app();
    let j = post_json(
        &app,
        "/chat/send",
        json!({ "session_id": "empty", "message": "   " }),
    )
    .await;
    assert_eq!(j["code"], 400);
    assert!(j.get("data").is_none());

    let j = get_json(&app, "/chat/history?session_id=empty").await;
    assert_eq!(j["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn clear_empties_history() {
    let app = test_app();
    post_json(
        &app,
        "/chat/send",
        json!({ "session_id": "c1", "message": "pain in my knee" }),
    )
    .await;
    let j = post_json(&app, "/chat/clear", json!({ "session_id": "c1" })).await;
    assert_eq!(j["code"], 200);
    assert_eq!(j["data"]["cleared"], 2);

    let j = get_json(&app, "/chat/history?session_id=c1").await;
    assert!(j["data"].as_array().unwrap().is_empty());

    let j = post_json(&app, "/chat/clear", json!({ "session_id": " " })).await;
    assert_eq!(j["code"], 400);
}

#[tokio::test]
async fn history_requires_session_id() {
    let app = test_app();
    let j = get_json(&app, "/chat/history").await;
    assert_eq!(j["code"], 400);
}

#[tokio::test]
async fn sessions_are_isolated() {
    let app = test_app();
    post_json(
        &app,
        "/chat/send",
        json!({ "session_id": "alice", "message": "my medication list" }),
    )
    .await;
    post_json(
        &app,
        "/chat/send",
        json!({ "session_id": "bob", "message": "symptom check" }),
    )
    .await;
    let j = get_json(&app, "/chat/history?session_id=bob").await;
    let turns = j["data"].as_array().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0]["message"], "symptom check");
}

#[tokio::test]
async fn transcript_escapes_user_html() {
    let app = test_app();
    post_json(
        &app,
        "/chat/send",
        json!({ "session_id": "xss", "message": "<img src=x onerror=alert(1)> fever" }),
    )
    .await;
    let html = get_text(&app, "/chat/transcript?session_id=xss").await;
    assert!(!html.contains("<img"));
    assert!(html.contains("&lt;img src=x onerror=alert(1)&gt; fever"));
    assert!(html.contains("assistant-message"));
    assert_eq!(get_text(&app, "/chat/transcript").await, "");
}

#[tokio::test]
async fn index_tips_and_health() {
    let app = test_app();
    let page = get_text(&app, "/").await;
    assert!(page.contains("Healthcare Assistant"));
    assert!(page.contains("/chat/send"));

    let j = get_json(&app, "/chat/tips").await;
    assert_eq!(j["data"].as_array().unwrap().len(), 3);

    assert_eq!(get_text(&app, "/health").await, "ok");
}

struct BrokenStore;

#[async_trait::async_trait]
impl SessionStore for BrokenStore {
    async fn append_exchange(
        &self,
        _session_id: &str,
        _user_turn: ChatTurn,
        _assistant_turn: ChatTurn,
    ) -> Result<usize, SessionStoreError> {
        Err(SessionStoreError::Other("disk full".to_string()))
    }

    async fn history(&self, _session_id: &str) -> Result<Vec<ChatTurn>, SessionStoreError> {
        Err(SessionStoreError::Other("disk full".to_string()))
    }

    async fn clear(&self, _session_id: &str) -> Result<usize, SessionStoreError> {
        Err(SessionStoreError::Other("disk full".to_string()))
    }
}

#[tokio::test]
async fn store_failure_surfaces_as_500() {
    let app = app_with(
        Arc::new(HealthcareAssistant::with_generator(MockGenerator::echo())),
        Arc::new(BrokenStore),
    );
    let j = post_json(&app, "/chat/send", json!({ "message": "fever" })).await;
    assert_eq!(j["code"], 500);
    assert!(j["message"].as_str().unwrap().contains("disk full"));

    let j = get_json(&app, "/chat/history?session_id=any").await;
    assert_eq!(j["code"], 500);
}

#[tokio::test]
async fn jsonl_history_survives_new_app() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");
    {
        let app = app_with(
            Arc::new(HealthcareAssistant::with_generator(MockGenerator::echo())),
            Arc::new(JsonlSessionStore::new(&path)),
        );
        post_json(
            &app,
            "/chat/send",
            json!({ "session_id": "persist", "message": "medication question" }),
        )
        .await;
    }
    let app = app_with(
        Arc::new(HealthcareAssistant::with_generator(MockGenerator::echo())),
        Arc::new(JsonlSessionStore::new(&path)),
    );
    let j = get_json(&app, "/chat/history?session_id=persist").await;
    let turns = j["data"].as_array().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0]["message"], "medication question");
}

#[tokio::test]
async fn malformed_bodies_get_the_envelope() {
    let app = test_app();
    for body in [
        json!({}).to_string(),
        json!({ "session_id": "s", "message": null }).to_string(),
        "not json".to_string(),
    ] {
        let j = post_raw(&app, "/chat/send", body.clone()).await;
        assert_eq!(j["code"], 400, "body: {body}");
        assert!(j.get("data").is_none());
    }

    let j = post_raw(&app, "/chat/clear", json!({}).to_string()).await;
    assert_eq!(j["code"], 400);

    let j = get_json(&app, "/chat/history?session_id=s").await;
    assert!(j["data"].as_array().unwrap().is_empty());
}

/// Appends succeed but every read fails.
struct WriteOnlyStore {
    inner: InMemorySessionStore,
}

#[async_trait::async_trait]
impl SessionStore for WriteOnlyStore {
    async fn append_exchange(
        &self,
        session_id: &str,
        user_turn: ChatTurn,
        assistant_turn: ChatTurn,
    ) -> Result<usize, SessionStoreError> {
        self.inner
            .append_exchange(session_id, user_turn, assistant_turn)
            .await
    }

    async fn history(&self, _session_id: &str) -> Result<Vec<ChatTurn>, SessionStoreError> {
        Err(SessionStoreError::Other("read timeout".to_string()))
    }

    async fn clear(&self, session_id: &str) -> Result<usize, SessionStoreError> {
        self.inner.clear(session_id).await
    }
}

#[tokio::test]
async fn stored_exchange_succeeds_even_if_reads_fail() {
    let app = app_with(
        Arc::new(HealthcareAssistant::with_generator(MockGenerator::echo())),
        Arc::new(WriteOnlyStore {
            inner: InMemorySessionStore::new(),
        }),
    );
    let j = post_json(
        &app,
        "/chat/send",
        json!({ "session_id": "w", "message": "fever again" }),
    )
    .await;
    assert_eq!(j["code"], 200);
    assert_eq!(j["data"]["history_len"], 2);

    let j = post_json(
        &app,
        "/chat/send",
        json!({ "session_id": "w", "message": "still a fever" }),
    )
    .await;
    assert_eq!(j["data"]["history_len"], 4);
}
