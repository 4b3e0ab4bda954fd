use super::core::Session;
use crate::config::ChatConfig;
use crate::events::EventSink;
use crate::exchange::{DemoExchangeClient, ExchangeClient, HttpExchangeClient};
use crate::payment::{HttpPaymentClient, PaymentClient};
use crate::transport::HttpTransport;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Builder for a fresh conversation.
///
/// Anything not injected explicitly is derived from the [`ChatConfig`]
/// (or from the environment when no config is given).
pub struct SessionBuilder {
    config: Option<ChatConfig>,
    service: Option<String>,
    exchange: Option<Arc<dyn ExchangeClient>>,
    payment: Option<Arc<dyn PaymentClient>>,
    events: Arc<dyn EventSink>,
    return_url: Option<String>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            service: None,
            exchange: None,
            payment: None,
            events: crate::events::noop_sink(),
            return_url: None,
        }
    }

    pub fn config(mut self, config: ChatConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Service the user picked before entering the chat.
    pub fn service(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.service = if name.trim().is_empty() { None } else { Some(name) };
        self
    }

    pub fn exchange_client(mut self, client: Arc<dyn ExchangeClient>) -> Self {
        self.exchange = Some(client);
        self
    }

    pub fn payment_client(mut self, client: Arc<dyn PaymentClient>) -> Self {
        self.payment = Some(client);
        self
    }

    /// Inject an event sink. Default is a no-op sink.
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Override the page the payment provider returns to.
    pub fn return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    pub fn build(self) -> Result<Session> {
        let config = match self.config {
            Some(config) => config,
            None => ChatConfig::from_env(),
        };

        // Built lazily: fully injected sessions never touch the network stack.
        let mut transport: Option<HttpTransport> = None;

        let exchange: Arc<dyn ExchangeClient> = match self.exchange {
            Some(client) => client,
            None if config.demo => Arc::new(DemoExchangeClient::new(Duration::from_millis(
                config.demo_delay_ms,
            ))),
            None => Arc::new(HttpExchangeClient::with_transport(
                shared_transport(&mut transport, &config)?,
                config.exchange_endpoint()?,
            )),
        };

        let payment: Option<Arc<dyn PaymentClient>> = match self.payment {
            Some(client) => Some(client),
            None if config.payment_url.is_some() => Some(Arc::new(HttpPaymentClient::with_transport(
                shared_transport(&mut transport, &config)?,
                config.payment_endpoint()?,
            ))),
            None => None,
        };

        let return_url = self.return_url.unwrap_or_else(|| config.return_url.clone());

        Ok(Session::new(
            self.service,
            return_url,
            exchange,
            payment,
            self.events,
        ))
    }
}

fn shared_transport(slot: &mut Option<HttpTransport>, config: &ChatConfig) -> Result<HttpTransport> {
    if let Some(transport) = slot {
        return Ok(transport.clone());
    }
    let transport = HttpTransport::new(config)?;
    *slot = Some(transport.clone());
    Ok(transport)
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
