//! Session events and the sinks that receive them.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`SessionEvent`] | What happened in a session |
//! | [`EventSink`] | Trait for event destinations |
//! | [`NoopEventSink`] | Default sink (drops everything) |
//! | [`InMemoryEventSink`] | Records events, for tests |
//! | [`ConsoleEventSink`] | Prints payment pages for the terminal front-end |

use crate::session::SessionStateKind;
use crate::types::{MessageId, MessageRole};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MessageAppended {
        id: MessageId,
        role: MessageRole,
    },
    StateChanged {
        from: SessionStateKind,
        to: SessionStateKind,
    },
    /// The payment page should be opened for the user in a new browsing target.
    OpenPaymentPage {
        url: String,
        payment_id: Option<String>,
    },
}

pub trait EventSink: Send + Sync {
    fn report(&self, event: SessionEvent);
}

pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn report(&self, _event: SessionEvent) {}
}

pub fn noop_sink() -> Arc<dyn EventSink> {
    Arc::new(NoopEventSink)
}

/// In-memory sink for testing.
#[derive(Default)]
pub struct InMemoryEventSink {
    events: RwLock<Vec<SessionEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded events
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.read().unwrap().clone()
    }

    /// `(from, to)` pairs of every recorded state change, oldest first
    pub fn state_changes(&self) -> Vec<(SessionStateKind, SessionStateKind)> {
        self.events
            .read()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                SessionEvent::StateChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    /// URLs of every payment page the session asked to open
    pub fn opened_pages(&self) -> Vec<String> {
        self.events
            .read()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                SessionEvent::OpenPaymentPage { url, .. } => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    /// Clear all recorded events
    pub fn clear(&self) {
        self.events.write().unwrap().clear();
    }
}

impl EventSink for InMemoryEventSink {
    fn report(&self, event: SessionEvent) {
        self.events.write().unwrap().push(event);
    }
}

/// Console sink: prints payment pages, leaves the rest to tracing.
pub struct ConsoleEventSink {
    prefix: String,
}

impl ConsoleEventSink {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for ConsoleEventSink {
    fn default() -> Self {
        Self::new("[Оплата]")
    }
}

impl EventSink for ConsoleEventSink {
    fn report(&self, event: SessionEvent) {
        match event {
            SessionEvent::OpenPaymentPage { url, .. } => {
                println!("{} Откройте страницу оплаты: {}", self.prefix, url);
            }
            other => tracing::debug!(event = ?other, "session event"),
        }
    }
}
