//! HTTP fetcher for Kick API responses.
//!
//! Responses are sometimes served wrapped in markup (`<pre>{...}</pre>`), so
//! tags are stripped before the body is parsed as JSON.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use kick_core::constants::{DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT};
use kick_core::error::{KickError, Result};
use kick_core::traits::Fetcher;

/// HTTP fetcher configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Fetches a URL over HTTP and parses the body as JSON.
///
/// A JSON `null` body is reported as `Ok(None)`; anything that is not JSON,
/// or does not match the requested type, is a
/// [`KickError::MalformedPayload`].
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    config: FetcherConfig,
    http_client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(FetcherConfig::default())
    }

    /// Creates a fetcher with custom configuration.
    pub fn with_config(config: FetcherConfig) -> Result<Self> {
        if config.timeout_seconds == 0 {
            return Err(KickError::InvalidConfig(
                "fetcher.timeout_seconds must be positive".into(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| KickError::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Downloads the raw body behind `url`.
    async fn download(&self, url: &str) -> Result<String> {
        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KickError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| self.transport_error(url, e))
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> KickError {
        if e.is_timeout() {
            KickError::Timeout {
                url: url.to_string(),
                seconds: self.config.timeout_seconds,
            }
        } else {
            KickError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl<T> Fetcher<T> for HttpFetcher
where
    T: DeserializeOwned + Send + 'static,
{
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Option<T>> {
        let body = self.download(url).await?;
        let payload = parse_payload(url, &body)?;

        let Some(value) = payload else {
            debug!(url, "Response body is null");
            return Ok(None);
        };

        let parsed = serde_json::from_value(value).map_err(|e| KickError::MalformedPayload {
            url: url.to_string(),
            reason: format!("unexpected shape: {}", e),
        })?;

        debug!(url, bytes = body.len(), "Fetched payload");
        Ok(Some(parsed))
    }
}

/// Strips markup and parses what remains as JSON. `null` becomes `None`.
fn parse_payload(url: &str, body: &str) -> Result<Option<Value>> {
    let text = strip_markup(body);
    let text = text.trim();
    if text.is_empty() {
        return Err(KickError::MalformedPayload {
            url: url.to_string(),
            reason: "empty body".into(),
        });
    }

    let value: Value = serde_json::from_str(text).map_err(|e| KickError::MalformedPayload {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    Ok((!value.is_null()).then_some(value))
}

/// Removes every `<...>` / `</...>` tag from `input`.
///
/// A `<` with no closing `>` after it, or an empty `<>`, is kept as text.
pub fn strip_markup(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) if close > 0 => rest = &after[close + 1..],
            _ => {
                output.push('<');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}
