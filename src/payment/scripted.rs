use super::{PaymentClient, PaymentConfirmation, PaymentFailure, PaymentRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Deterministic payment double: replays queued outcomes and records requests.
#[derive(Default)]
pub struct ScriptedPaymentClient {
    outcomes: Mutex<VecDeque<Result<PaymentConfirmation, PaymentFailure>>>,
    requests: Mutex<Vec<PaymentRequest>>,
    delay: Option<Duration>,
}

impl ScriptedPaymentClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm(self, url: impl Into<String>, payment_id: Option<&str>) -> Self {
        self.outcomes.lock().unwrap().push_back(Ok(PaymentConfirmation {
            confirmation_url: url.into(),
            payment_id: payment_id.map(str::to_string),
        }));
        self
    }

    pub fn fail(self, detail: impl Into<String>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(PaymentFailure::new(detail)));
        self
    }

    /// Hold every call for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentClient for ScriptedPaymentClient {
    async fn initiate_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentConfirmation, PaymentFailure> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.outcomes.lock().unwrap().pop_front();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        next.unwrap_or_else(|| Err(PaymentFailure::new("script exhausted")))
    }
}
