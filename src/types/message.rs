//! Conversation messages.

use super::attachment::Attachment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session-local message identifier; strictly increasing in append order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Role name used on the wire by the AI exchange endpoint.
    pub fn as_wire(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Payment offer attached to an assistant reply that quoted a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProposal {
    /// Whole roubles, always positive.
    pub amount: u64,
    pub description: String,
}

/// A chat message. Immutable once appended to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: MessageRole,
    text: String,
    timestamp: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payment_proposal: Option<PaymentProposal>,
}

impl Message {
    pub(crate) fn user(
        id: MessageId,
        text: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> Self {
        Self {
            id,
            role: MessageRole::User,
            text: text.into(),
            timestamp: display_time(),
            attachments,
            payment_proposal: None,
        }
    }

    pub(crate) fn assistant(
        id: MessageId,
        text: impl Into<String>,
        payment_proposal: Option<PaymentProposal>,
    ) -> Self {
        Self {
            id,
            role: MessageRole::Assistant,
            text: text.into(),
            timestamp: display_time(),
            attachments: Vec::new(),
            payment_proposal,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn payment_proposal(&self) -> Option<&PaymentProposal> {
        self.payment_proposal.as_ref()
    }
}

fn display_time() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_hours_and_minutes() {
        let msg = Message::assistant(MessageId(1), "hi", None);
        let ts = msg.timestamp();
        assert_eq!(ts.len(), 5);
        assert_eq!(&ts[2..3], ":");
    }

    #[test]
    fn assistant_messages_never_carry_attachments() {
        let msg = Message::assistant(MessageId(7), "ok", None);
        assert!(msg.attachments().is_empty());
        assert!(msg.is_assistant());
        assert_eq!(msg.role().as_wire(), "assistant");
    }
}
