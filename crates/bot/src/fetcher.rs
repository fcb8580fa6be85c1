use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

use crate::config::http_client;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Эндпоинт {endpoint} недоступен: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Эндпоинт {endpoint} недоступен. Код ответа API: {status}")]
    Status { endpoint: String, status: u16 },
    #[error("ответ API от {endpoint} не является JSON: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// HTTP status for non-200 replies.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Source of raw status payloads, one request per call.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetches statuses changed since `from_date` (unix seconds).
    async fn fetch(&self, from_date: i64) -> Result<Value, FetchError>;
}

/// Grading API client.
///
/// Anything other than `200 OK` with a JSON body is an error; callers never
/// see a raw response.
pub struct HttpStatusFetcher {
    client: Client,
    endpoint: Url,
    token: String,
}

impl HttpStatusFetcher {
    pub fn new(endpoint: &str, token: String, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint).with_context(|| format!("parse endpoint {endpoint}"))?;
        Ok(Self {
            client: http_client(timeout)?,
            endpoint,
            token,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl StatusSource for HttpStatusFetcher {
    async fn fetch(&self, from_date: i64) -> Result<Value, FetchError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("from_date", &from_date.to_string());

        let resp = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                endpoint: self.endpoint.to_string(),
                source,
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                endpoint: self.endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|source| FetchError::Decode {
                endpoint: self.endpoint.to_string(),
                source,
            })
    }
}
