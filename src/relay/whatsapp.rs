use std::io::ErrorKind;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};
use crate::error::{PiketError, Result};
use super::{Relay, SENT_STATUS};

pub const DEFAULT_OPENER: &str = "xdg-open";

const SHARE_BASE: &str = "https://wa.me/";

/// Click-to-chat link that opens WhatsApp with `text` prefilled
pub fn share_link(text: &str) -> String {
    format!("{}?text={}", SHARE_BASE, urlencoding::encode(text))
}

/// Hands the share link to a local opener program (`xdg-open` by default)
#[derive(Debug, Clone)]
pub struct WhatsappRelay {
    opener: String,
}

impl WhatsappRelay {
    pub fn new(opener: impl Into<String>) -> Self {
        Self { opener: opener.into() }
    }
}

#[async_trait]
impl Relay for WhatsappRelay {
    fn id(&self) -> &'static str {
        "whatsapp"
    }

    async fn send(&self, text: &str) -> Result<String> {
        let link = share_link(text);
        match Command::new(&self.opener).arg(&link).status().await {
            Ok(status) if status.success() => {
                info!(opener = %self.opener, "opened whatsapp share link");
                Ok(SENT_STATUS.to_string())
            }
            Ok(status) => {
                warn!(opener = %self.opener, %status, "share opener failed");
                Err(PiketError::ShareFailed)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(PiketError::ShareTargetMissing),
            Err(e) => Err(PiketError::Io(e)),
        }
    }
}
