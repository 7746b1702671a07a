mod common;

use serde_json::{json, Value};

#[tokio::test]
async fn chat_answers_with_the_mock_model() {
    let app = common::spawn_app().await;

    let reply = app.chat("alice", "What is bail?").await;

    assert_eq!(
        reply,
        "This is a mock response to: 'What is bail?'. The backend is running in lightweight mode."
    );
}

#[tokio::test]
async fn chat_uses_default_user_when_none_given() {
    let app = common::spawn_app().await;

    let response = app
        .post_json("/chat", &json!({"user_query": "Hello"}))
        .await;
    assert_eq!(200, response.status().as_u16());

    let saved: Value = app
        .post_json("/chat/save", &json!({"user_id": "default_user"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(saved["status"], "saved");
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let app = common::spawn_app().await;

    let response = app
        .post_json("/chat", &json!({"user_query": "", "user_id": "alice"}))
        .await;

    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn malformed_body_returns_detail() {
    let app = common::spawn_app().await;

    let response = app
        .client
        .post(format!("{}/chat", app.address))
        .header("Content-Type", "application/json")
        .body(r#"{"user_query": 12"#)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("Invalid request body"));
}

#[tokio::test]
async fn session_reset_clears_memory() {
    let app = common::spawn_app().await;
    app.chat("alice", "Tell me about tenancy law").await;

    let response = app
        .post_json("/session/reset", &json!({"user_id": "alice"}))
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "Memory cleared"}));

    let saved: Value = app
        .post_json("/chat/save", &json!({"user_id": "alice"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(
        saved,
        json!({"status": "ignored", "message": "No messages to save"})
    );
}
