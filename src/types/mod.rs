//! # Types Module
//!
//! Core data types of a conversation.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Immutable chat message (user or assistant) |
//! | [`MessageRole`] | Who authored the message |
//! | [`Attachment`] | File reference carried by a sent user message |
//! | [`PendingAttachment`] | File selected but not yet sent |
//! | [`PaymentProposal`] | Amount and description derived from an assistant reply |

pub mod attachment;
pub mod message;

pub use attachment::{Attachment, PendingAttachment, ALLOWED_EXTENSIONS};
pub use message::{Message, MessageId, MessageRole, PaymentProposal};
