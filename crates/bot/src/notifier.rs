use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::http_client;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("не удалось отправить сообщение в Telegram: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Telegram отклонил сообщение (код {status}): {description}")]
    Rejected { status: u16, description: String },
}

/// Outbound channel to the single recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API `sendMessage` client bound to one chat.
pub struct TelegramNotifier {
    client: Client,
    send_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        api_base: &str,
        token: &str,
        chat_id: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let send_url = format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), token);
        Ok(Self {
            client: http_client(timeout)?,
            send_url,
            chat_id,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let req = SendMessage {
            chat_id: &self.chat_id,
            text,
        };
        // The request URL embeds the bot token; strip it from transport errors.
        let resp = self
            .client
            .post(&self.send_url)
            .json(&req)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.without_url()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| NotifyError::Transport(e.without_url()))?;
        // Proxies in front of the API may answer with HTML; keep the status then.
        let reply = serde_json::from_str::<BotReply>(&body).ok();

        match reply {
            Some(BotReply { ok: true, .. }) if status.is_success() => {}
            Some(reply) => {
                return Err(NotifyError::Rejected {
                    status: status.as_u16(),
                    description: reply
                        .description
                        .unwrap_or_else(|| "no description".to_string()),
                })
            }
            None => {
                return Err(NotifyError::Rejected {
                    status: status.as_u16(),
                    description: body_excerpt(&body),
                })
            }
        }
        Ok(())
    }
}

fn body_excerpt(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    match trimmed.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
