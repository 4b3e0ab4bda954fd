//! Busy-state machine of a session.
//!
//! ```text
//!          begin_turn            begin_payment
//!   Exchanging <──── Idle ────> AwaitingPayment
//!        └── finish_turn ──┘└── finish_payment ──┘
//!            abandon_turn           abandon_payment
//! ```
//!
//! Every transition names the ticket it belongs to, so an outcome can only
//! close the call that produced it.

use crate::{Error, Result};
use std::fmt;

/// Identifies one outstanding network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicketId(pub(crate) u64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Exchanging {
        ticket: TicketId,
    },
    AwaitingPayment {
        ticket: TicketId,
    },
}

/// [`SessionState`] without ticket data, for display and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStateKind {
    Idle,
    Exchanging,
    AwaitingPayment,
}

impl fmt::Display for SessionStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionStateKind::Idle => "idle",
            SessionStateKind::Exchanging => "exchanging",
            SessionStateKind::AwaitingPayment => "awaiting payment",
        })
    }
}

impl SessionState {
    pub fn kind(&self) -> SessionStateKind {
        match self {
            SessionState::Idle => SessionStateKind::Idle,
            SessionState::Exchanging { .. } => SessionStateKind::Exchanging,
            SessionState::AwaitingPayment { .. } => SessionStateKind::AwaitingPayment,
        }
    }

    /// Ticket of the outstanding call, if any.
    pub fn ticket(&self) -> Option<TicketId> {
        match self {
            SessionState::Idle => None,
            SessionState::Exchanging { ticket } | SessionState::AwaitingPayment { ticket } => {
                Some(*ticket)
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    pub fn is_waiting_for_reply(&self) -> bool {
        matches!(self, SessionState::Exchanging { .. })
    }

    pub fn is_creating_payment(&self) -> bool {
        matches!(self, SessionState::AwaitingPayment { .. })
    }

    pub(crate) fn begin_exchange(self, ticket: TicketId) -> Result<Self> {
        match self {
            SessionState::Idle => Ok(SessionState::Exchanging { ticket }),
            other => Err(Error::invalid_state("send a message", other.kind())),
        }
    }

    pub(crate) fn finish_exchange(self, ticket: TicketId) -> Result<Self> {
        match self {
            SessionState::Exchanging { ticket: current } if current == ticket => {
                Ok(SessionState::Idle)
            }
            other => Err(Error::invalid_state("complete this exchange", other.kind())),
        }
    }

    pub(crate) fn begin_payment(self, ticket: TicketId) -> Result<Self> {
        match self {
            SessionState::Idle => Ok(SessionState::AwaitingPayment { ticket }),
            other => Err(Error::invalid_state("start a payment", other.kind())),
        }
    }

    pub(crate) fn finish_payment(self, ticket: TicketId) -> Result<Self> {
        match self {
            SessionState::AwaitingPayment { ticket: current } if current == ticket => {
                Ok(SessionState::Idle)
            }
            other => Err(Error::invalid_state("complete this payment", other.kind())),
        }
    }
}
