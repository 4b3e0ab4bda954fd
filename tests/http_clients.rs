//! HTTP exchange and payment clients against a mock server.

mod integration;

use integration::mock_server::{MockServerFixture, EXCHANGE_PATH, PAYMENT_PATH};
use jurbot::events::InMemoryEventSink;
use jurbot::exchange::ExchangeClient;
use jurbot::payment::PaymentClient;
use jurbot::{ExchangeRequest, PaymentRequest, SessionBuilder};
use serde_json::json;
use std::sync::Arc;

fn request(service: Option<&str>) -> ExchangeRequest {
    ExchangeRequest {
        messages: vec![jurbot::exchange::WireMessage {
            role: "user".into(),
            content: "Сколько стоит анализ?".into(),
        }],
        service: service.map(str::to_string),
        attachments: vec![],
    }
}

fn payment_request() -> PaymentRequest {
    PaymentRequest {
        amount: 5000,
        description: "Анализ договора".into(),
        return_url: "https://jurbot.example/chat".into(),
    }
}

#[tokio::test]
async fn exchange_posts_history_and_service() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_exchange(
            EXCHANGE_PATH,
            json!({
                "messages": [{"role": "user", "content": "Сколько стоит анализ?"}],
                "service": "Полный анализ договора",
            }),
            200,
            r#"{"reply":"Стоимость: 3 000 ₽"}"#,
        )
        .await;

    let reply = fixture
        .exchange_client()
        .send_exchange(&request(Some("Полный анализ договора")))
        .await
        .expect("exchange should succeed");

    assert_eq!(reply, "Стоимость: 3 000 ₽");
    mock.assert_async().await;
}

#[tokio::test]
async fn exchange_strips_reasoning_block() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(
            EXCHANGE_PATH,
            200,
            r#"{"reply":"<think>оцениваю</think>\n\nГотово."}"#,
        )
        .await;

    let reply = fixture.exchange_client().send_exchange(&request(None)).await.unwrap();
    assert_eq!(reply, "Готово.");
}

#[tokio::test]
async fn exchange_failures_are_uniform() {
    let cases = [
        (502, r#"{"error":"AI error: 500"}"#),
        (400, r#"{"error":"No messages"}"#),
        (200, r#"{"status":"ok"}"#),
        (200, "<html>gateway</html>"),
        (200, r#"{"reply":42}"#),
    ];

    for (status, body) in cases {
        let fixture = MockServerFixture::new().await;
        let _mock = fixture.mock_json_response(EXCHANGE_PATH, status, body).await;

        let result = fixture.exchange_client().send_exchange(&request(None)).await;
        assert!(result.is_err(), "status {} body {} should fail", status, body);
    }
}

#[tokio::test]
async fn exchange_transport_error_is_a_failure() {
    let config = jurbot::ChatConfig::default().with_exchange_url("http://127.0.0.1:9/ai-chat");
    let client = jurbot::exchange::HttpExchangeClient::new(&config).unwrap();
    let failure = client.send_exchange(&request(None)).await.unwrap_err();
    assert!(failure.detail().starts_with("request failed"));
}

#[tokio::test]
async fn payment_posts_exact_body() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_exchange(
            PAYMENT_PATH,
            json!({
                "amount": 5000,
                "description": "Анализ договора",
                "return_url": "https://jurbot.example/chat",
            }),
            200,
            r#"{"confirmation_url":"https://pay.example/x","payment_id":"P1"}"#,
        )
        .await;

    let confirmation = fixture
        .payment_client()
        .initiate_payment(&payment_request())
        .await
        .expect("payment should succeed");

    assert_eq!(confirmation.confirmation_url, "https://pay.example/x");
    assert_eq!(confirmation.payment_id.as_deref(), Some("P1"));
    mock.assert_async().await;
}

#[tokio::test]
async fn payment_accepts_payment_url_alias() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(
            PAYMENT_PATH,
            200,
            r#"{"payment_url":"https://yoomoney.example/quickpay?sum=5000.00"}"#,
        )
        .await;

    let confirmation = fixture
        .payment_client()
        .initiate_payment(&payment_request())
        .await
        .unwrap();
    assert_eq!(
        confirmation.confirmation_url,
        "https://yoomoney.example/quickpay?sum=5000.00"
    );
    assert_eq!(confirmation.payment_id, None);
}

#[tokio::test]
async fn payment_without_confirmation_url_fails() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(PAYMENT_PATH, 200, r#"{"payment_id":"P9"}"#)
        .await;

    let failure = fixture
        .payment_client()
        .initiate_payment(&payment_request())
        .await
        .unwrap_err();
    assert_eq!(failure.detail(), "response has no confirmation URL");
}

#[tokio::test]
async fn payment_error_status_fails() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(PAYMENT_PATH, 400, r#"{"error":"Invalid amount"}"#)
        .await;

    let failure = fixture
        .payment_client()
        .initiate_payment(&payment_request())
        .await
        .unwrap_err();
    assert_eq!(failure.detail(), "HTTP 400: Invalid amount");
}

#[tokio::test]
async fn session_quotes_and_pays_over_http() {
    let fixture = MockServerFixture::new().await;
    let chat = fixture
        .mock_json_exchange(
            EXCHANGE_PATH,
            json!({
                "messages": [{"role": "user", "content": "Нужен анализ договора аренды"}],
                "service": "Анализ договора",
            }),
            200,
            r#"{"reply":"Итого 5 000 ₽ за работу"}"#,
        )
        .await;
    let pay = fixture
        .mock_json_exchange(
            PAYMENT_PATH,
            json!({
                "amount": 5000,
                "description": "Анализ договора",
                "return_url": "https://jurbot.example/chat",
            }),
            200,
            r#"{"confirmation_url":"https://pay.example/x","payment_id":"P1"}"#,
        )
        .await;

    let sink = Arc::new(InMemoryEventSink::new());
    let mut session = SessionBuilder::new()
        .config(fixture.config())
        .service("Анализ договора")
        .event_sink(sink.clone())
        .build()
        .unwrap();

    let reply = session
        .send_message("Нужен анализ договора аренды")
        .await
        .unwrap()
        .expect("a reply");
    assert_eq!(reply.payment_proposal().map(|p| p.amount), Some(5000));

    let confirmation = session.pay_latest_proposal().await.unwrap();
    assert!(confirmation.text().contains("P1"));
    assert!(confirmation.text().contains("5 000"));
    assert_eq!(sink.opened_pages(), vec!["https://pay.example/x".to_string()]);
    assert!(session.state().is_idle());

    chat.assert_async().await;
    pay.assert_async().await;
}
