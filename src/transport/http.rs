use crate::config::ChatConfig;
use crate::{Error, Result};
use reqwest::Proxy;
use serde::Serialize;
use std::env;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Raw outcome of one HTTP round trip: status plus undecoded body.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Shared JSON-over-HTTP transport used by the exchange and payment clients.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        // Minimal production-friendly defaults (env-overridable).
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs.max(1)))
            .pool_max_idle_per_host(
                env::var("JURBOT_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(8),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy_url {
            if let Ok(proxy) = Proxy::all(proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client })
    }

    /// Wrap an already configured client (useful when the caller shares a pool).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// POST a JSON body and read the whole response as text.
    ///
    /// Non-2xx statuses are returned, not raised; only transport failures are errors.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &B,
    ) -> std::result::Result<HttpReply, TransportError> {
        debug!(%url, "POST");
        let response = self
            .client
            .post(url.clone())
            .header("accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(%url, status, bytes = body.len(), "response received");
        Ok(HttpReply { status, body })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
