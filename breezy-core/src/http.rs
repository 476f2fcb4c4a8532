//! Thin reqwest wrapper shared by all sources.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{config::Config, error::SourceError};

#[derive(Debug, Clone)]
pub struct SourceClient {
    http: Client,
}

impl SourceClient {
    /// Builds a client with the configured per-call timeout and User-Agent.
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SourceError::ConnectionFailed(e.to_string()))?;

        Ok(Self { http })
    }

    /// GET `url` and return the body, mapping non-success statuses to errors.
    pub async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, SourceError> {
        debug!(url, "GET");

        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(SourceError::ServiceUnavailable(format!(
                "HTTP {status}: {}",
                truncate_body(&body)
            )));
        }
        if !status.is_success() {
            return Err(SourceError::RequestFailed {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }

    /// GET `url` and decode the JSON body into `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let body = self.get_text(url, query).await?;
        serde_json::from_str(&body).map_err(|e| {
            SourceError::ParseError(format!("{e} in response from {url}: {}", truncate_body(&body)))
        })
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
