//! Error types for piketers.

/// Failures below the display boundary. Every surface turns these into a
/// user-visible status string; none of them cross the generator/formatter.
#[derive(Debug, thiserror::Error)]
pub enum PiketError {
    /// Settings file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON.
    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// Transport failure talking to the Bot API.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Bot API answered, but not with a usable result.
    #[error("{0}")]
    Api(String),

    /// Bot token or chat id not configured.
    #[error("{0}")]
    MissingCredentials(&'static str),

    /// Share target application is not available.
    #[error("Whatsapp Not Installed!")]
    ShareTargetMissing,

    /// Share target was found but refused the message.
    #[error("Unable to send message!")]
    ShareFailed,

    /// Rejected user input (blank member name, bad index).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, PiketError>;
