use std::time::Duration;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};
use crate::error::{PiketError, Result};
use crate::settings::SettingsStore;
use super::{Relay, SENT_STATUS};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    message: Option<UpdateMessage>,
}

#[derive(Debug, Deserialize)]
struct UpdateMessage {
    from: Option<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: i64,
    username: Option<String>,
}

/// Minimal Telegram Bot API client: `sendMessage` and `getUpdates`
#[derive(Clone)]
pub struct TelegramClient {
    base_url: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, token, method)
    }

    /// Posts `text` to `chat_id` with Markdown parsing
    pub async fn send_message(&self, token: &str, chat_id: &str, text: &str) -> Result<String> {
        let response = self
            .client
            .post(self.method_url(token, "sendMessage"))
            .form(&[("chat_id", chat_id), ("text", text), ("parse_mode", "Markdown")])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "sendMessage rejected");
            return Err(PiketError::Api(format!("Unexpected response code: {}", response.status().as_u16())));
        }

        let body: ApiResponse<serde_json::Value> = response.json().await?;
        if body.ok {
            info!(chat_id, "message delivered to telegram");
            Ok(SENT_STATUS.to_string())
        } else {
            Err(PiketError::Api(format!(
                "Failed to send message: {}",
                body.description.unwrap_or_default()
            )))
        }
    }

    /// Finds the chat id of a user who has messaged the bot.
    ///
    /// The match is case-insensitive and ignores a leading `@`. `Ok(None)`
    /// means the bot has no recent update from that user.
    pub async fn lookup_chat_id(&self, token: &str, username: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.method_url(token, "getUpdates"))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "getUpdates rejected");
            return Err(PiketError::Api(format!("Unexpected response code: {}", response.status().as_u16())));
        }

        let body: ApiResponse<Vec<Update>> = response.json().await?;
        if !body.ok {
            return Err(PiketError::Api(format!(
                "Failed to get updates: {}",
                body.description.unwrap_or_default()
            )));
        }

        let wanted = username.replace('@', "");
        let chat_id = body
            .result
            .unwrap_or_default()
            .into_iter()
            .filter_map(|update| update.message?.from)
            .find(|user| {
                user.username
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(&wanted))
            })
            .map(|user| user.id.to_string());
        debug!(username = %wanted, found = chat_id.is_some(), "looked up chat id");
        Ok(chat_id)
    }
}

/// Sends to the chat configured in settings
pub struct TelegramRelay {
    client: TelegramClient,
    token: String,
    chat_id: String,
}

impl TelegramRelay {
    /// Fails before any network call when the token or chat id is blank
    pub fn from_settings(client: TelegramClient, settings: &SettingsStore) -> Result<Self> {
        let token = settings.bot_token();
        if token.trim().is_empty() {
            return Err(PiketError::MissingCredentials("Please set the Telegram bot token in settings first"));
        }
        let chat_id = settings.target_chat_id();
        if chat_id.trim().is_empty() {
            return Err(PiketError::MissingCredentials("Please set the target chat ID in settings first"));
        }
        Ok(Self { client, token, chat_id })
    }
}

#[async_trait]
impl Relay for TelegramRelay {
    fn id(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, text: &str) -> Result<String> {
        self.client.send_message(&self.token, &self.chat_id, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_url_joins_base_token_and_method() {
        let client = TelegramClient::new("http://localhost:9000/");
        assert_eq!(client.method_url("123:abc", "sendMessage"), "http://localhost:9000/bot123:abc/sendMessage");
    }

    #[test]
    fn relay_requires_token() {
        let settings = SettingsStore::in_memory();
        let result = TelegramRelay::from_settings(TelegramClient::new(DEFAULT_API_BASE), &settings);
        assert!(matches!(result, Err(PiketError::MissingCredentials(msg)) if msg.contains("bot token")));
    }

    #[test]
    fn relay_requires_chat_id() {
        let mut settings = SettingsStore::in_memory();
        settings.set_bot_token("123:abc").unwrap();
        let result = TelegramRelay::from_settings(TelegramClient::new(DEFAULT_API_BASE), &settings);
        assert!(matches!(result, Err(PiketError::MissingCredentials(msg)) if msg.contains("chat ID")));
    }

    #[test]
    fn updates_payload_parses() {
        let payload = serde_json::json!({
            "ok": true,
            "result": [
                {"update_id": 1},
                {"update_id": 2, "message": {"text": "hi"}},
                {"update_id": 3, "message": {"from": {"id": 77, "username": "Budi", "is_bot": false}}}
            ]
        });
        let body: ApiResponse<Vec<Update>> = serde_json::from_value(payload).unwrap();
        assert!(body.ok);
        let updates = body.result.unwrap();
        assert_eq!(updates.len(), 3);
        assert!(updates[0].message.is_none());
        let from = updates[2].message.as_ref().and_then(|m| m.from.as_ref()).unwrap();
        assert_eq!(from.id, 77);
    }
}
