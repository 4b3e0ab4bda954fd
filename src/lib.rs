//! # jurbot
//!
//! Conversational session controller for a legal/financial advisory assistant.
//!
//! A user exchanges turns with a remote AI assistant, may attach files (only
//! their names and sizes are sent), and gets a payment proposal whenever the
//! assistant quotes a price in roubles. Triggering the proposal creates an
//! external payment page.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jurbot::{ChatConfig, SessionBuilder};
//!
//! #[tokio::main]
//! async fn main() -> jurbot::Result<()> {
//!     let config = ChatConfig::from_env();
//!     config.validate()?;
//!
//!     let mut session = SessionBuilder::new()
//!         .config(config)
//!         .service("Полный анализ договора")
//!         .build()?;
//!
//!     session.attach_file("lease.pdf").await?;
//!     if let Some(reply) = session.send_message("Проверьте, пожалуйста").await? {
//!         println!("{}", reply.text());
//!     }
//!     if session.latest_proposal().is_some() {
//!         session.pay_latest_proposal().await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`session`] | Session state store, busy-state machine, call tickets |
//! | [`exchange`] | AI exchange seam with HTTP, demo and scripted clients |
//! | [`payment`] | Payment initiation seam with HTTP and scripted clients |
//! | [`pricing`] | Rouble price extraction and amount formatting |
//! | [`export`] | Export of the latest answer as txt / md / json |
//! | [`catalog`] | Service catalog and welcome text |
//! | [`events`] | Session events and sinks |
//! | [`config`] | Endpoint and transport configuration |
//! | [`transport`] | Shared JSON-over-HTTP transport |
//! | [`types`] | Messages, attachments, payment proposals |

pub mod catalog;
pub mod config;
pub mod events;
pub mod exchange;
pub mod export;
pub mod payment;
pub mod pricing;
pub mod session;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use config::ChatConfig;
pub use events::{EventSink, SessionEvent};
pub use exchange::{ExchangeClient, ExchangeFailure, ExchangeRequest};
pub use export::{ExportArtifact, ExportFormat};
pub use payment::{PaymentClient, PaymentConfirmation, PaymentFailure, PaymentRequest};
pub use session::{Session, SessionBuilder, SessionState};
pub use types::{Attachment, Message, MessageId, MessageRole, PaymentProposal, PendingAttachment};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
