use super::{ExchangeClient, ExchangeFailure, ExchangeRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Deterministic exchange double: replays queued outcomes in order and records requests.
///
/// Once the queue is empty every call fails.
#[derive(Default)]
pub struct ScriptedExchangeClient {
    outcomes: Mutex<VecDeque<Result<String, ExchangeFailure>>>,
    requests: Mutex<Vec<ExchangeRequest>>,
    delay: Option<Duration>,
}

impl ScriptedExchangeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()))
    }

    pub fn fail(self, detail: impl Into<String>) -> Self {
        self.push(Err(ExchangeFailure::new(detail)))
    }

    /// Hold every call for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn push(self, outcome: Result<String, ExchangeFailure>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn requests(&self) -> Vec<ExchangeRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.lock().unwrap().len()
    }
}

#[async_trait]
impl ExchangeClient for ScriptedExchangeClient {
    async fn send_exchange(&self, request: &ExchangeRequest) -> Result<String, ExchangeFailure> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.outcomes.lock().unwrap().pop_front();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        next.unwrap_or_else(|| Err(ExchangeFailure::new("script exhausted")))
    }
}
