//! HTTP client for the AI exchange endpoint.

use super::{ExchangeClient, ExchangeFailure, ExchangeRequest};
use crate::config::ChatConfig;
use crate::transport::HttpTransport;
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Posts `{messages, service}` and expects `{reply}` back. Single attempt, no retries.
pub struct HttpExchangeClient {
    transport: HttpTransport,
    endpoint: Url,
}

impl HttpExchangeClient {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let endpoint = config.exchange_endpoint()?;
        Ok(Self::with_transport(HttpTransport::new(config)?, endpoint))
    }

    pub fn with_transport(transport: HttpTransport, endpoint: Url) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ExchangeClient for HttpExchangeClient {
    async fn send_exchange(&self, request: &ExchangeRequest) -> std::result::Result<String, ExchangeFailure> {
        debug!(turns = request.messages.len(), "sending exchange");
        let reply = self
            .transport
            .post_json(&self.endpoint, &request.body())
            .await
            .map_err(|e| ExchangeFailure::new(format!("request failed: {}", e)))?;

        let parsed = serde_json::from_str::<ExchangeResponse>(&reply.body);

        if !reply.is_success() {
            let reason = parsed
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| "no error message".to_string());
            warn!(status = reply.status, %reason, "exchange endpoint returned an error");
            return Err(ExchangeFailure::new(format!("HTTP {}: {}", reply.status, reason)));
        }

        let text = parsed
            .map_err(|e| ExchangeFailure::new(format!("malformed response: {}", e)))?
            .reply
            .ok_or_else(|| ExchangeFailure::new("response has no reply field"))?;

        Ok(strip_reasoning(&text))
    }
}

/// Drop a leading `<think>...</think>` block some models emit before the answer.
pub(crate) fn strip_reasoning(reply: &str) -> String {
    const OPEN: &str = "<think>";
    const CLOSE: &str = "</think>";
    if reply.starts_with(OPEN) {
        if let Some(end) = reply.find(CLOSE) {
            return reply[end + CLOSE.len()..].trim().to_string();
        }
    }
    reply.to_string()
}
