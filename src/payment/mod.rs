//! Payment initiation: turns a payment proposal into a hosted payment page.

mod client;
mod scripted;

pub use client::HttpPaymentClient;
pub use scripted::ScriptedPaymentClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Any failed payment initiation. No subtypes; `detail` is for logs only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("payment initiation failed: {detail}")]
pub struct PaymentFailure {
    detail: String,
}

impl PaymentFailure {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Body posted to the payment endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: u64,
    pub description: String,
    pub return_url: String,
}

/// A created payment: where to send the user, and the provider's reference if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub confirmation_url: String,
    pub payment_id: Option<String>,
}

#[async_trait]
pub trait PaymentClient: Send + Sync {
    async fn initiate_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentConfirmation, PaymentFailure>;
}
