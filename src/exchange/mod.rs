//! AI exchange: one request per turn carrying the whole visible history.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ExchangeClient`] | Narrow seam the session talks to |
//! | [`HttpExchangeClient`] | JSON-over-HTTP implementation |
//! | [`DemoExchangeClient`] | Offline implementation with canned, delayed replies |
//! | [`ScriptedExchangeClient`] | Deterministic double that replays queued outcomes |

mod client;
mod demo;
mod scripted;

pub use client::HttpExchangeClient;
pub use demo::DemoExchangeClient;
pub use scripted::ScriptedExchangeClient;

use crate::types::{Attachment, Message};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Any failed exchange. Carries no subtype; `detail` is for logs only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("AI exchange failed: {detail}")]
pub struct ExchangeFailure {
    detail: String,
}

impl ExchangeFailure {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// One entry of the upstream `messages` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

/// Everything an exchange needs, detached from the session that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRequest {
    /// Prior turns (welcome message excluded) followed by the new turn.
    pub messages: Vec<WireMessage>,
    pub service: Option<String>,
    /// Attachments of the new turn only.
    pub attachments: Vec<Attachment>,
}

/// Borrowed view of a request in the endpoint's wire shape.
#[derive(Debug, Serialize)]
pub struct ExchangeBody<'a> {
    pub messages: &'a [WireMessage],
    pub service: &'a str,
}

impl ExchangeRequest {
    pub(crate) fn for_turn(history: &[Message], turn: &Message, service: Option<&str>) -> Self {
        let messages = history
            .iter()
            .chain(std::iter::once(turn))
            .map(|m| WireMessage {
                role: m.role().as_wire().to_string(),
                content: turn_content(m.text(), m.attachments()),
            })
            .collect();
        Self {
            messages,
            service: service.map(str::to_string),
            attachments: turn.attachments().to_vec(),
        }
    }

    /// The newest user turn, as sent upstream.
    pub fn latest_turn(&self) -> Option<&WireMessage> {
        self.messages.last()
    }

    /// Body as posted to the exchange endpoint; a missing service is sent as `""`.
    pub fn body(&self) -> ExchangeBody<'_> {
        ExchangeBody {
            messages: &self.messages,
            service: self.service.as_deref().unwrap_or(""),
        }
    }
}

/// Message text followed by a bracketed list of attached file names and sizes.
pub fn turn_content(text: &str, attachments: &[Attachment]) -> String {
    if attachments.is_empty() {
        return text.to_string();
    }
    let files = attachments
        .iter()
        .map(|a| format!("{} ({})", a.name, a.size_label))
        .collect::<Vec<_>>()
        .join(", ");
    let note = format!("[Прикреплённые файлы: {}]", files);
    if text.trim().is_empty() {
        note
    } else {
        format!("{}\n\n{}", text, note)
    }
}

/// Send the conversation so far and get the assistant's reply text.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    async fn send_exchange(&self, request: &ExchangeRequest) -> Result<String, ExchangeFailure>;
}
