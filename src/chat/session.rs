//! Chat Session Controller
//!
//! Owns the conversation history of one chat window and sequences a
//! submission: record the user turn, show it, call the service, show the
//! reply (or a fixed error notice).
//!
//! Submissions are serialized by rejecting new ones while a request is in
//! flight. A submission is split in two phases, [`ChatSession::begin_submit`]
//! and [`ChatSession::complete_submit`], so hosts that keep the session in a
//! `RefCell` can release the borrow while the request is outstanding.

use uuid::Uuid;

use super::dto::{ChatRequest, ChatResponse};
use super::history::{ConversationHistory, Role, Turn};
use super::renderer::{RenderedMessage, Renderer};
use super::transport::ChatTransport;
use crate::error::{RequestResult, SubmitRejected};

/// Greeting shown after the conversation is cleared
pub const DEFAULT_GREETING: &str =
    "Hello! I'm your Enterprise AI Assistant. How can I help you today?";

/// Notice shown when a chat request fails
pub const DEFAULT_ERROR_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

/// Fixed texts the session renders on its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMessages {
    pub greeting: String,
    pub error_message: String,
}

impl Default for SessionMessages {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Ticket for a submission whose response has not arrived yet
#[derive(Debug)]
#[must_use = "a pending turn must be passed to complete_submit"]
pub struct PendingTurn {
    generation: u64,
    request: ChatRequest,
}

impl PendingTurn {
    /// Request to send to the chat endpoint
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// How a submitted turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Reply recorded and rendered
    Replied,
    /// Request failed, error notice rendered
    Failed,
    /// Conversation was cleared while the request was in flight
    Discarded,
}

/// Controller for one chat conversation
pub struct ChatSession<R: Renderer> {
    id: Uuid,
    history: ConversationHistory,
    pending: bool,
    typing_indicator_visible: bool,
    /// Bumped by `clear()`; responses from an older generation are dropped
    generation: u64,
    messages: SessionMessages,
    renderer: R,
}

impl<R: Renderer> ChatSession<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_messages(renderer, SessionMessages::default())
    }

    pub fn with_messages(renderer: R, messages: SessionMessages) -> Self {
        Self {
            id: Uuid::new_v4(),
            history: ConversationHistory::new(),
            pending: false,
            typing_indicator_visible: false,
            generation: 0,
            messages,
            renderer,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn typing_indicator_visible(&self) -> bool {
        self.typing_indicator_visible
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Submit a query and wait for the reply.
    ///
    /// Returns `Err` without touching any state when the query is blank or a
    /// previous submission is still in flight.
    pub async fn submit<T>(
        &mut self,
        transport: &T,
        query: &str,
        tier: &str,
        severity: &str,
    ) -> Result<TurnOutcome, SubmitRejected>
    where
        T: ChatTransport + ?Sized,
    {
        let turn = self.begin_submit(query, tier, severity)?;
        let result = transport.send(turn.request()).await;
        Ok(self.complete_submit(turn, result))
    }

    /// First half of a submission: record and show the user turn, show the
    /// typing indicator and build the request.
    pub fn begin_submit(
        &mut self,
        query: &str,
        tier: &str,
        severity: &str,
    ) -> Result<PendingTurn, SubmitRejected> {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!(session_id = %self.id, "Ignoring empty query");
            return Err(SubmitRejected::EmptyQuery);
        }
        if self.pending {
            tracing::warn!(session_id = %self.id, "Rejecting query while a request is in flight");
            return Err(SubmitRejected::Busy);
        }

        self.history.push(Turn::user(query));
        self.render_message(query, Role::User, false);
        self.renderer.clear_input();
        self.show_typing_indicator(true);
        self.pending = true;

        tracing::info!(
            session_id = %self.id,
            turns = self.history.len(),
            tier = %tier,
            severity = %severity,
            "Submitting chat query"
        );

        Ok(PendingTurn {
            generation: self.generation,
            request: ChatRequest {
                query: query.to_string(),
                tier: tier.to_string(),
                severity: severity.to_string(),
                history: self.history.clone(),
            },
        })
    }

    /// Second half of a submission: record and show the reply, or show the
    /// error notice; then hide the typing indicator.
    pub fn complete_submit(
        &mut self,
        turn: PendingTurn,
        result: RequestResult<ChatResponse>,
    ) -> TurnOutcome {
        if turn.generation != self.generation {
            tracing::debug!(session_id = %self.id, "Dropping response for a cleared conversation");
            return TurnOutcome::Discarded;
        }

        let outcome = match result {
            Ok(reply) => {
                self.history.push(Turn::assistant(reply.response.as_str()));
                self.render_message(&reply.response, Role::Assistant, true);
                tracing::debug!(session_id = %self.id, turns = self.history.len(), "Reply received");
                TurnOutcome::Replied
            }
            Err(e) => {
                tracing::error!(session_id = %self.id, error = %e, "Error fetching chat response");
                let notice = self.messages.error_message.clone();
                self.render_message(&notice, Role::Assistant, false);
                TurnOutcome::Failed
            }
        };

        self.show_typing_indicator(false);
        self.pending = false;
        outcome
    }

    /// Forget the conversation and show the greeting.
    ///
    /// Any request still in flight is abandoned: its response will be
    /// discarded when it arrives.
    pub fn clear(&mut self) {
        self.history.clear();
        self.generation = self.generation.wrapping_add(1);
        self.pending = false;
        self.show_typing_indicator(false);
        self.renderer.clear_transcript();

        let greeting = self.messages.greeting.clone();
        self.render_message(&greeting, Role::Assistant, false);

        tracing::info!(session_id = %self.id, "Conversation cleared");
    }

    /// Append a message to the transcript. Does not touch the history.
    pub fn render_message(&mut self, text: &str, role: Role, parse_markdown: bool) {
        self.renderer
            .append_message(RenderedMessage::new(text, role, parse_markdown));
        self.renderer.scroll_to_bottom();
    }

    pub fn show_typing_indicator(&mut self, show: bool) {
        if show == self.typing_indicator_visible {
            return;
        }
        if show {
            self.renderer.show_typing_indicator();
        } else {
            self.renderer.hide_typing_indicator();
        }
        self.typing_indicator_visible = show;
    }
}
