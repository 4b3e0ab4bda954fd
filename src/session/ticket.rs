//! Detached network calls.
//!
//! A ticket owns everything its call needs, so it can be awaited inline or
//! moved onto another task while the session keeps serving the user. Its
//! outcome goes back through `Session::finish_turn` / `Session::finish_payment`.

use super::state::TicketId;
use crate::exchange::{ExchangeClient, ExchangeFailure, ExchangeRequest};
use crate::payment::{PaymentClient, PaymentConfirmation, PaymentFailure, PaymentRequest};
use std::sync::Arc;

pub struct ExchangeTicket {
    id: TicketId,
    request: ExchangeRequest,
    client: Arc<dyn ExchangeClient>,
}

impl ExchangeTicket {
    pub(crate) fn new(id: TicketId, request: ExchangeRequest, client: Arc<dyn ExchangeClient>) -> Self {
        Self {
            id,
            request,
            client,
        }
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn request(&self) -> &ExchangeRequest {
        &self.request
    }

    pub async fn run(self) -> ExchangeOutcome {
        let result = self.client.send_exchange(&self.request).await;
        ExchangeOutcome {
            ticket: self.id,
            result,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExchangeOutcome {
    pub(crate) ticket: TicketId,
    pub(crate) result: Result<String, ExchangeFailure>,
}

impl ExchangeOutcome {
    pub fn ticket(&self) -> TicketId {
        self.ticket
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct PaymentTicket {
    id: TicketId,
    request: PaymentRequest,
    client: Arc<dyn PaymentClient>,
}

impl PaymentTicket {
    pub(crate) fn new(id: TicketId, request: PaymentRequest, client: Arc<dyn PaymentClient>) -> Self {
        Self {
            id,
            request,
            client,
        }
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }

    pub async fn run(self) -> PaymentOutcome {
        let result = self.client.initiate_payment(&self.request).await;
        PaymentOutcome {
            ticket: self.id,
            amount: self.request.amount,
            result,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub(crate) ticket: TicketId,
    pub(crate) amount: u64,
    pub(crate) result: Result<PaymentConfirmation, PaymentFailure>,
}

impl PaymentOutcome {
    pub fn ticket(&self) -> TicketId {
        self.ticket
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
