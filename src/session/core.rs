use super::state::{SessionState, TicketId};
use super::ticket::{ExchangeOutcome, ExchangeTicket, PaymentOutcome, PaymentTicket};
use crate::catalog::welcome_text;
use crate::events::{EventSink, SessionEvent};
use crate::exchange::{ExchangeClient, ExchangeRequest};
use crate::payment::{PaymentClient, PaymentRequest};
use crate::pricing::{extract_price, format_amount};
use crate::types::{Message, MessageId, PaymentProposal, PendingAttachment};
use crate::{Error, ErrorContext, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Shown when an exchange fails for any reason.
pub const EXCHANGE_FAILURE_TEXT: &str =
    "Извините, не удалось получить ответ. Проверьте соединение и попробуйте ещё раз.";

/// Shown when a payment could not be created for any reason.
pub const PAYMENT_FAILURE_TEXT: &str =
    "Не удалось создать платёж. Попробуйте ещё раз немного позже.";

/// One conversation: the message list, the busy state and the not-yet-sent input.
///
/// Build it with [`SessionBuilder`](super::SessionBuilder) when the chat is
/// entered and drop it on exit; nothing outlives the value.
pub struct Session {
    pub(crate) id: Uuid,
    pub(crate) service: Option<String>,
    pub(crate) messages: Vec<Message>,
    pub(crate) draft: String,
    pub(crate) pending_attachments: Vec<PendingAttachment>,
    pub(crate) state: SessionState,
    pub(crate) next_message_id: u64,
    pub(crate) next_ticket_id: u64,
    pub(crate) return_url: String,
    pub(crate) exchange: Arc<dyn ExchangeClient>,
    pub(crate) payment: Option<Arc<dyn PaymentClient>>,
    pub(crate) events: Arc<dyn EventSink>,
}

impl Session {
    pub(crate) fn new(
        service: Option<String>,
        return_url: String,
        exchange: Arc<dyn ExchangeClient>,
        payment: Option<Arc<dyn PaymentClient>>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            service,
            messages: Vec::new(),
            draft: String::new(),
            pending_attachments: Vec::new(),
            state: SessionState::Idle,
            next_message_id: 1,
            next_ticket_id: 1,
            return_url,
            exchange,
            payment,
            events,
        };
        let id = session.next_message_id();
        let welcome = Message::assistant(id, welcome_text(session.service.as_deref()), None);
        session.append(welcome);
        info!(session = %session.id, service = ?session.service, "session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_waiting_for_reply(&self) -> bool {
        self.state.is_waiting_for_reply()
    }

    pub fn is_creating_payment(&self) -> bool {
        self.state.is_creating_payment()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages that take part in exchanges: everything but the welcome message.
    pub fn history(&self) -> &[Message] {
        &self.messages[1..]
    }

    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_assistant())
    }

    /// Newest message carrying a payment proposal.
    pub fn latest_proposal(&self) -> Option<(&Message, &PaymentProposal)> {
        self.messages
            .iter()
            .rev()
            .find_map(|m| m.payment_proposal().map(|p| (m, p)))
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn pending_attachments(&self) -> &[PendingAttachment] {
        &self.pending_attachments
    }

    pub fn add_attachment(&mut self, attachment: PendingAttachment) {
        debug!(session = %self.id, name = %attachment.name, "attachment selected");
        self.pending_attachments.push(attachment);
    }

    pub async fn attach_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let attachment = PendingAttachment::from_path(path).await?;
        self.add_attachment(attachment);
        Ok(())
    }

    /// Drop a selected file before it is sent.
    pub fn remove_attachment(&mut self, index: usize) -> Result<PendingAttachment> {
        if index >= self.pending_attachments.len() {
            return Err(Error::validation_with_context(
                format!("no pending attachment at position {}", index),
                ErrorContext::new()
                    .with_field_path(format!("pending_attachments[{}]", index))
                    .with_details(format!("{} pending", self.pending_attachments.len())),
            ));
        }
        Ok(self.pending_attachments.remove(index))
    }

    /// Append a user turn and hand out the exchange that answers it.
    ///
    /// Returns `Ok(None)` without touching anything when there is neither
    /// non-blank text nor a pending attachment.
    pub fn begin_turn(&mut self, text: &str) -> Result<Option<ExchangeTicket>> {
        if text.trim().is_empty() && self.pending_attachments.is_empty() {
            return Ok(None);
        }

        let ticket = TicketId(self.next_ticket_id);
        let next_state = self.state.begin_exchange(ticket)?;
        self.next_ticket_id += 1;

        let attachments = self
            .pending_attachments
            .drain(..)
            .map(|p| p.to_attachment())
            .collect();
        let id = self.next_message_id();
        let turn = Message::user(id, text, attachments);
        let request = ExchangeRequest::for_turn(self.history(), &turn, self.service.as_deref());

        self.append(turn);
        self.draft.clear();
        self.set_state(next_state);
        info!(session = %self.id, %ticket, turns = request.messages.len(), "exchange started");

        Ok(Some(ExchangeTicket::new(ticket, request, self.exchange.clone())))
    }

    /// [`begin_turn`](Self::begin_turn) with the current draft.
    pub fn submit_draft(&mut self) -> Result<Option<ExchangeTicket>> {
        let text = self.draft.clone();
        self.begin_turn(&text)
    }

    /// Record the answer (or the failure) of an exchange and return to idle.
    pub fn finish_turn(&mut self, outcome: ExchangeOutcome) -> Result<&Message> {
        let next_state = self.state.finish_exchange(outcome.ticket)?;
        let id = self.next_message_id();
        let reply = match outcome.result {
            Ok(text) => {
                let proposal = extract_price(&text, self.service.as_deref());
                info!(
                    session = %self.id,
                    ticket = %outcome.ticket,
                    proposal = ?proposal.as_ref().map(|p| p.amount),
                    "exchange completed"
                );
                Message::assistant(id, text, proposal)
            }
            Err(failure) => {
                warn!(session = %self.id, ticket = %outcome.ticket, error = %failure, "exchange failed");
                Message::assistant(id, EXCHANGE_FAILURE_TEXT, None)
            }
        };
        let index = self.append(reply);
        self.set_state(next_state);
        Ok(&self.messages[index])
    }

    /// Close an exchange whose outcome will never arrive (ticket dropped, task
    /// panicked or cancelled). Appends the generic failure message and returns to idle.
    ///
    /// The outstanding ticket can be read from [`state`](Self::state) when the
    /// caller no longer holds it, e.g. after dropping a `send_message` future.
    pub fn abandon_turn(&mut self, ticket: TicketId) -> Result<&Message> {
        let next_state = self.state.finish_exchange(ticket)?;
        warn!(session = %self.id, %ticket, "exchange abandoned");
        let id = self.next_message_id();
        let index = self.append(Message::assistant(id, EXCHANGE_FAILURE_TEXT, None));
        self.set_state(next_state);
        Ok(&self.messages[index])
    }

    /// Send `text` and wait for the reply. `Ok(None)` when there was nothing to send.
    pub async fn send_message(&mut self, text: &str) -> Result<Option<&Message>> {
        let ticket = match self.begin_turn(text)? {
            Some(ticket) => ticket,
            None => return Ok(None),
        };
        let outcome = ticket.run().await;
        self.finish_turn(outcome).map(Some)
    }

    /// Start paying the proposal carried by `message_id`.
    pub fn begin_payment(&mut self, message_id: MessageId) -> Result<PaymentTicket> {
        let client = self.payment.clone().ok_or_else(|| {
            Error::configuration_with_context(
                "payment endpoint is not configured",
                ErrorContext::new().with_field_path("payment_url"),
            )
        })?;

        let proposal = self
            .messages
            .iter()
            .find(|m| m.id() == message_id)
            .and_then(|m| m.payment_proposal())
            .cloned()
            .ok_or_else(|| {
                Error::validation_with_context(
                    format!("message {} has no payment proposal", message_id),
                    ErrorContext::new().with_source("session"),
                )
            })?;

        let ticket = TicketId(self.next_ticket_id);
        let next_state = self.state.begin_payment(ticket)?;
        self.next_ticket_id += 1;
        self.set_state(next_state);
        info!(session = %self.id, %ticket, amount = proposal.amount, "payment started");

        let request = PaymentRequest {
            amount: proposal.amount,
            description: proposal.description,
            return_url: self.return_url.clone(),
        };
        Ok(PaymentTicket::new(ticket, request, client))
    }

    /// Record the payment result as an assistant message and return to idle.
    pub fn finish_payment(&mut self, outcome: PaymentOutcome) -> Result<&Message> {
        let next_state = self.state.finish_payment(outcome.ticket)?;
        let id = self.next_message_id();
        let message = match outcome.result {
            Ok(confirmation) => {
                let text = confirmation_text(confirmation.payment_id.as_deref(), outcome.amount);
                self.events.report(SessionEvent::OpenPaymentPage {
                    url: confirmation.confirmation_url,
                    payment_id: confirmation.payment_id,
                });
                Message::assistant(id, text, None)
            }
            Err(failure) => {
                warn!(session = %self.id, ticket = %outcome.ticket, error = %failure, "payment failed");
                Message::assistant(id, PAYMENT_FAILURE_TEXT, None)
            }
        };
        let index = self.append(message);
        self.set_state(next_state);
        Ok(&self.messages[index])
    }

    /// Payment counterpart of [`abandon_turn`](Self::abandon_turn).
    pub fn abandon_payment(&mut self, ticket: TicketId) -> Result<&Message> {
        let next_state = self.state.finish_payment(ticket)?;
        warn!(session = %self.id, %ticket, "payment abandoned");
        let id = self.next_message_id();
        let index = self.append(Message::assistant(id, PAYMENT_FAILURE_TEXT, None));
        self.set_state(next_state);
        Ok(&self.messages[index])
    }

    pub async fn trigger_payment(&mut self, message_id: MessageId) -> Result<&Message> {
        let outcome = self.begin_payment(message_id)?.run().await;
        self.finish_payment(outcome)
    }

    /// Pay the newest proposal in the conversation.
    pub async fn pay_latest_proposal(&mut self) -> Result<&Message> {
        let id = self
            .latest_proposal()
            .map(|(m, _)| m.id())
            .ok_or_else(|| Error::validation("there is no payment proposal to pay"))?;
        self.trigger_payment(id).await
    }

    fn next_message_id(&mut self) -> MessageId {
        let id = MessageId(self.next_message_id);
        self.next_message_id += 1;
        id
    }

    fn append(&mut self, message: Message) -> usize {
        self.events.report(SessionEvent::MessageAppended {
            id: message.id(),
            role: message.role(),
        });
        self.messages.push(message);
        self.messages.len() - 1
    }

    fn set_state(&mut self, next: SessionState) {
        let from = self.state.kind();
        self.state = next;
        self.events.report(SessionEvent::StateChanged {
            from,
            to: next.kind(),
        });
    }
}

fn confirmation_text(payment_id: Option<&str>, amount: u64) -> String {
    let amount = format_amount(amount);
    match payment_id {
        Some(id) => format!(
            "Платёж {} на сумму {} ₽ создан. Страница оплаты открыта в новой вкладке; \
             после оплаты вы вернётесь в чат.",
            id, amount
        ),
        None => format!(
            "Платёж на сумму {} ₽ создан. Страница оплаты открыта в новой вкладке; \
             после оплаты вы вернётесь в чат.",
            amount
        ),
    }
}
