pub mod telegram;
pub mod whatsapp;

use async_trait::async_trait;
use tracing::{info, warn};
use crate::error::Result;

pub use telegram::{TelegramClient, TelegramRelay, DEFAULT_API_BASE};
pub use whatsapp::{share_link, WhatsappRelay, DEFAULT_OPENER};

pub const SENT_STATUS: &str = "Message sent successfully!";

/// Outbound channel for a finished message. New channels only need to
/// implement this trait.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Stable channel identifier (`telegram`, `whatsapp`)
    fn id(&self) -> &'static str;

    /// Delivers `text`; the Ok value is a user-facing status line
    async fn send(&self, text: &str) -> Result<String>;
}

/// Sends `text` through `relay`, logging the outcome under the relay's id
pub async fn deliver(relay: &dyn Relay, text: &str) -> Result<String> {
    let outcome = relay.send(text).await;
    match &outcome {
        Ok(_) => info!(relay = relay.id(), "message relayed"),
        Err(e) => warn!(relay = relay.id(), error = %e, "relay failed"),
    }
    outcome
}

/// Turns a relay outcome into the status line shown to the user
pub fn status_line(outcome: &Result<String>) -> String {
    match outcome {
        Ok(status) => status.clone(),
        Err(e) => format!("Error: {}", e),
    }
}
