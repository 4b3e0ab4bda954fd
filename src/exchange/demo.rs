//! Offline exchange used for demos: waits a little, then answers from a script.

use super::{ExchangeClient, ExchangeFailure, ExchangeRequest};
use async_trait::async_trait;
use std::time::Duration;

pub struct DemoExchangeClient {
    delay: Duration,
}

impl DemoExchangeClient {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn canned_reply(request: &ExchangeRequest) -> String {
        let files = request.attachments.len();
        match (files, request.service.as_deref()) {
            (0, _) => "Понял вашу задачу. Для точного расчёта стоимости мне потребуется \
                       проанализировать ваши документы. Пожалуйста, загрузите файлы \
                       или выберите конкретную услугу в каталоге."
                .to_string(),
            (n, Some(_)) => format!(
                "Документы получены ({n} шт.). Провожу анализ...\n\n\
                 📊 **Результат анализа:**\n\
                 • Объём: {n} документ(ов)\n\
                 • Сложность: средняя\n\
                 • Ориентировочное время: 2-4 часа\n\n\
                 💰 **Стоимость: 5 000 ₽**\n\n\
                 Для оплаты нажмите кнопку ниже. После подтверждения оплаты я сразу приступлю к работе."
            ),
            (n, None) => format!(
                "Получил ваши файлы ({n} шт.). Чтобы я мог провести анализ, выберите тип услуги:\n\n\
                 1. Анализ договоров\n\
                 2. Консультация по законодательству\n\
                 3. Подготовка документов\n\n\
                 Или опишите задачу своими словами."
            ),
        }
    }
}

impl Default for DemoExchangeClient {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait]
impl ExchangeClient for DemoExchangeClient {
    async fn send_exchange(&self, request: &ExchangeRequest) -> Result<String, ExchangeFailure> {
        tokio::time::sleep(self.delay).await;
        Ok(Self::canned_reply(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::extract_price;
    use crate::types::PendingAttachment;

    fn request(files: usize, service: Option<&str>) -> ExchangeRequest {
        ExchangeRequest {
            messages: vec![],
            service: service.map(str::to_string),
            attachments: (0..files)
                .map(|i| {
                    PendingAttachment::new(format!("doc{}.pdf", i), 1024)
                        .unwrap()
                        .to_attachment()
                })
                .collect(),
        }
    }

    #[test]
    fn files_with_service_get_a_priced_analysis() {
        let client = DemoExchangeClient::new(Duration::ZERO);
        let reply = tokio_test::block_on(client.send_exchange(&request(2, Some("Полный анализ договора"))))
            .unwrap();
        assert!(reply.starts_with("Документы получены (2 шт.)"));
        assert_eq!(extract_price(&reply, None).map(|p| p.amount), Some(5000));
    }

    #[test]
    fn files_without_service_ask_for_a_service() {
        let reply = DemoExchangeClient::canned_reply(&request(1, None));
        assert!(reply.starts_with("Получил ваши файлы (1 шт.)"));
        assert!(extract_price(&reply, None).is_none());
    }

    #[test]
    fn plain_text_asks_for_documents() {
        let reply = DemoExchangeClient::canned_reply(&request(0, Some("Устная консультация")));
        assert!(reply.contains("загрузите файлы"));
    }
}
