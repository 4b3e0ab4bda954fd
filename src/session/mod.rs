//! # Session Module
//!
//! The conversation controller. A [`Session`] owns the append-only message
//! list, the pending attachments and a [`SessionState`] that allows at most
//! one outstanding network call.
//!
//! A turn is split in three steps so the caller stays responsive while the
//! AI backend is thinking:
//!
//! ```rust,no_run
//! # async fn demo() -> jurbot::Result<()> {
//! use jurbot::{ChatConfig, SessionBuilder};
//!
//! let mut session = SessionBuilder::new()
//!     .config(ChatConfig::default().with_demo(true))
//!     .service("Полный анализ договора")
//!     .build()?;
//!
//! if let Some(ticket) = session.begin_turn("Проверьте договор аренды")? {
//!     let outcome = tokio::spawn(ticket.run()).await.expect("exchange task");
//!     let reply = session.finish_turn(outcome)?;
//!     println!("{}", reply.text());
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod core;
mod state;
mod ticket;

pub use self::builder::SessionBuilder;
pub use self::core::{Session, EXCHANGE_FAILURE_TEXT, PAYMENT_FAILURE_TEXT};
pub use self::state::{SessionState, SessionStateKind, TicketId};
pub use self::ticket::{ExchangeOutcome, ExchangeTicket, PaymentOutcome, PaymentTicket};
