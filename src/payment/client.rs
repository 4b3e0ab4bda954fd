use super::{PaymentClient, PaymentConfirmation, PaymentFailure, PaymentRequest};
use crate::config::ChatConfig;
use crate::transport::HttpTransport;
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    #[serde(default, alias = "payment_url")]
    confirmation_url: Option<String>,
    #[serde(default)]
    payment_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Posts `{amount, description, return_url}` to the payment endpoint. Single attempt.
///
/// A 2xx answer without a confirmation URL is a failure.
pub struct HttpPaymentClient {
    transport: HttpTransport,
    endpoint: Url,
}

impl HttpPaymentClient {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let endpoint = config.payment_endpoint()?;
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
impl PaymentClient for HttpPaymentClient {
    async fn initiate_payment(
        &self,
        request: &PaymentRequest,
    ) -> std::result::Result<PaymentConfirmation, PaymentFailure> {
        let reply = self
            .transport
            .post_json(&self.endpoint, request)
            .await
            .map_err(|e| PaymentFailure::new(format!("request failed: {}", e)))?;

        let parsed = serde_json::from_str::<PaymentResponse>(&reply.body);

        if !reply.is_success() {
            let reason = parsed
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| "no error message".to_string());
            warn!(status = reply.status, %reason, "payment endpoint returned an error");
            return Err(PaymentFailure::new(format!("HTTP {}: {}", reply.status, reason)));
        }

        let response =
            parsed.map_err(|e| PaymentFailure::new(format!("malformed response: {}", e)))?;

        match response.confirmation_url.filter(|u| !u.trim().is_empty()) {
            Some(confirmation_url) => {
                info!(payment_id = ?response.payment_id, "payment created");
                Ok(PaymentConfirmation {
                    confirmation_url,
                    payment_id: response.payment_id,
                })
            }
            None => {
                warn!(payment_id = ?response.payment_id, "payment response has no confirmation URL");
                Err(PaymentFailure::new("response has no confirmation URL"))
            }
        }
    }
}
