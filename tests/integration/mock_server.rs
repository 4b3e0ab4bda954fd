//! Mock HTTP server setup for integration tests

use jurbot::exchange::HttpExchangeClient;
use jurbot::payment::HttpPaymentClient;
use jurbot::transport::HttpTransport;
use jurbot::ChatConfig;
use mockito::{Matcher, Mock, Server, ServerGuard};
use tokio::sync::Mutex;
use url::Url;

pub const EXCHANGE_PATH: &str = "/ai-chat";
pub const PAYMENT_PATH: &str = "/create-payment";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Mutex<ServerGuard>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Mutex::new(server),
            base_url,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Config pointing both endpoints at the mock server.
    pub fn config(&self) -> ChatConfig {
        ChatConfig::default()
            .with_exchange_url(self.url(EXCHANGE_PATH))
            .with_payment_url(self.url(PAYMENT_PATH))
            .with_return_url("https://jurbot.example/chat")
    }

    pub fn exchange_client(&self) -> HttpExchangeClient {
        let transport = HttpTransport::new(&ChatConfig::default()).expect("transport");
        HttpExchangeClient::with_transport(transport, Url::parse(&self.url(EXCHANGE_PATH)).unwrap())
    }

    pub fn payment_client(&self) -> HttpPaymentClient {
        let transport = HttpTransport::new(&ChatConfig::default()).expect("transport");
        HttpPaymentClient::with_transport(transport, Url::parse(&self.url(PAYMENT_PATH)).unwrap())
    }

    /// Create a mock for a JSON response
    pub async fn mock_json_response(&self, path: &str, status: usize, body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock that only answers when the request body equals `expected`
    pub async fn mock_json_exchange(
        &self,
        path: &str,
        expected: serde_json::Value,
        status: usize,
        body: &str,
    ) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", path)
            .match_body(Matcher::Json(expected))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }
}
