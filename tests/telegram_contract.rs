//! Telegram Bot API contract tests
//!
//! Verify the request shape of `sendMessage`/`getUpdates` and how their
//! responses map to statuses and errors, against a local mock server.

use piketers::relay::{Relay, TelegramClient, TelegramRelay, SENT_STATUS};
use piketers::settings::SettingsStore;
use piketers::PiketError;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123:abc";

// ────────────────────────────────────────────────────────────────────────────
// sendMessage
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn send_message_posts_form_with_markdown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_string_contains("chat_id=-10042"))
        .and(body_string_contains("parse_mode=Markdown"))
        .and(body_string_contains("text=Kuy%2C+piket+sampah"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 5}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TelegramClient::new(mock_server.uri());
    let status = client.send_message(TOKEN, "-10042", "Kuy, piket sampah").await.unwrap();
    assert_eq!(status, SENT_STATUS);
}

#[tokio::test]
async fn send_message_not_ok_carries_description() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "description": "Bad Request: chat not found"
        })))
        .mount(&mock_server)
        .await;

    let client = TelegramClient::new(mock_server.uri());
    let err = client.send_message(TOKEN, "1", "hi").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to send message: Bad Request: chat not found");
}

#[tokio::test]
async fn send_message_http_error_reports_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ok": false,
            "description": "Unauthorized"
        })))
        .mount(&mock_server)
        .await;

    let client = TelegramClient::new(mock_server.uri());
    let err = client.send_message(TOKEN, "1", "hi").await.unwrap_err();
    assert!(matches!(err, PiketError::Api(ref msg) if msg == "Unexpected response code: 401"));
}

#[tokio::test]
async fn relay_sends_to_configured_chat() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_string_contains("chat_id=777"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut settings = SettingsStore::in_memory();
    settings.set_bot_token(TOKEN).unwrap();
    settings.set_target_chat_id("777").unwrap();

    let relay = TelegramRelay::from_settings(TelegramClient::new(mock_server.uri()), &settings).unwrap();
    assert_eq!(relay.id(), "telegram");
    assert_eq!(relay.send("*JADWAL PIKET MAKAN*").await.unwrap(), SENT_STATUS);
}

// ────────────────────────────────────────────────────────────────────────────
// getUpdates
// ────────────────────────────────────────────────────────────────────────────

fn updates_body() -> serde_json::Value {
    json!({
        "ok": true,
        "result": [
            {"update_id": 1, "channel_post": {"text": "ignored"}},
            {"update_id": 2, "message": {"text": "no sender"}},
            {"update_id": 3, "message": {"from": {"id": 11, "is_bot": false, "first_name": "Ana"}}},
            {"update_id": 4, "message": {"from": {"id": 22, "is_bot": false, "username": "BudiS"}}},
            {"update_id": 5, "message": {"from": {"id": 33, "is_bot": false, "username": "budis"}}}
        ]
    })
}

#[tokio::test]
async fn lookup_matches_username_case_insensitively() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bot123:abc/getUpdates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updates_body()))
        .mount(&mock_server)
        .await;

    let client = TelegramClient::new(mock_server.uri());
    let chat_id = client.lookup_chat_id(TOKEN, "@budis").await.unwrap();
    assert_eq!(chat_id.as_deref(), Some("22"));
}

#[tokio::test]
async fn lookup_unknown_username_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bot123:abc/getUpdates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updates_body()))
        .mount(&mock_server)
        .await;

    let client = TelegramClient::new(mock_server.uri());
    assert!(client.lookup_chat_id(TOKEN, "citra").await.unwrap().is_none());
}

#[tokio::test]
async fn lookup_not_ok_carries_description() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bot123:abc/getUpdates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "description": "Conflict: webhook is active"
        })))
        .mount(&mock_server)
        .await;

    let client = TelegramClient::new(mock_server.uri());
    let err = client.lookup_chat_id(TOKEN, "budi").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to get updates: Conflict: webhook is active");
}

#[tokio::test]
async fn lookup_malformed_body_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bot123:abc/getUpdates"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = TelegramClient::new(mock_server.uri());
    let err = client.lookup_chat_id(TOKEN, "budi").await.unwrap_err();
    assert!(matches!(err, PiketError::Http(_)));
}
