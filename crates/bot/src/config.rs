use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use reqwest::Client;
use homework_core::{check_tokens, Credentials, MissingCredential};

/// Default grading API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Parser)]
#[command(
    name = "homework-bot",
    version,
    about = "Polls homework review statuses and relays changes to Telegram"
)]
pub struct Cli {
    /// Grading API OAuth token.
    #[arg(long, env = "PRACTICUM_TOKEN", hide_env_values = true)]
    pub practicum_token: Option<String>,

    /// Telegram bot token.
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub telegram_token: Option<String>,

    /// Chat that receives notifications.
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,

    /// Homework statuses endpoint.
    #[arg(long, env = "HOMEWORK_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Telegram Bot API base URL.
    #[arg(long, env = "TELEGRAM_API_URL", default_value = DEFAULT_TELEGRAM_API_URL)]
    pub telegram_api_url: String,

    /// Pause between polling cycles.
    #[arg(long, env = "RETRY_SECONDS", default_value_t = 600)]
    pub retry_seconds: u64,

    /// How far back the first query window reaches.
    #[arg(long, env = "LOOKBACK_SECONDS", default_value_t = 0)]
    pub lookback_seconds: u64,

    /// Timeout applied to every HTTP request.
    #[arg(long, env = "REQUEST_TIMEOUT_SECONDS", default_value_t = 30)]
    pub request_timeout_seconds: u64,

    /// Log level (env-filter syntax).
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log: String,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub credentials: Credentials,
    pub endpoint: String,
    pub telegram_api_url: String,
    pub retry_interval: Duration,
    pub lookback: Duration,
    pub request_timeout: Duration,
}

impl Cli {
    /// Runs the credential gate and freezes the settings.
    pub fn into_config(self) -> Result<BotConfig, MissingCredential> {
        let credentials =
            check_tokens(self.practicum_token, self.telegram_token, self.telegram_chat_id)?;
        Ok(BotConfig {
            credentials,
            endpoint: self.endpoint,
            telegram_api_url: self.telegram_api_url,
            retry_interval: Duration::from_secs(self.retry_seconds),
            lookback: Duration::from_secs(self.lookback_seconds),
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
        })
    }
}

/// HTTP client shared by both adapters; every request is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("build http client")
}
