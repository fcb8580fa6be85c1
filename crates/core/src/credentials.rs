use std::fmt;

use thiserror::Error;

/// Environment variable holding the grading API token.
pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the recipient chat id.
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// A required credential was absent or blank.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("required environment variable {0} is not set")]
pub struct MissingCredential(pub &'static str);

impl MissingCredential {
    /// Name of the missing variable.
    pub fn variable(&self) -> &'static str {
        self.0
    }
}

/// The three secrets the notifier needs; all guaranteed non-blank.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Grading API token, sent as `Authorization: OAuth <token>`.
    pub practicum_token: String,
    /// Telegram bot token.
    pub telegram_token: String,
    /// Recipient chat id.
    pub telegram_chat_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

/// Startup gate: every credential must be present and non-blank.
///
/// Variables are checked in a fixed order and the first missing one is
/// reported.
pub fn check_tokens(
    practicum_token: Option<String>,
    telegram_token: Option<String>,
    telegram_chat_id: Option<String>,
) -> Result<Credentials, MissingCredential> {
    fn require(value: Option<String>, name: &'static str) -> Result<String, MissingCredential> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(MissingCredential(name)),
        }
    }

    Ok(Credentials {
        practicum_token: require(practicum_token, PRACTICUM_TOKEN)?,
        telegram_token: require(telegram_token, TELEGRAM_TOKEN)?,
        telegram_chat_id: require(telegram_chat_id, TELEGRAM_CHAT_ID)?,
    })
}
