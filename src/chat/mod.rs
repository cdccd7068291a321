//! Chat
//!
//! Client side of the assistant conversation.
//!
//! ## Architecture
//!
//! - **ChatSession**: owns the history and sequences each submission
//! - **Renderer**: display capability the session draws through
//! - **ChatTransport**: delivers a request to the `/chat` endpoint
//!
//! ## Data Flow
//!
//! 1. Front end calls `submit` (or `begin_submit`/`complete_submit`)
//! 2. The user turn is recorded and rendered as plain text
//! 3. The transport posts query, tier, severity and full history
//! 4. The reply is recorded and rendered as Markdown

mod dto;
mod history;
mod renderer;
mod session;
mod transport;

pub use dto::{ChatRequest, ChatResponse};
pub use history::{ConversationHistory, Role, Turn};
pub use renderer::{MessageFormat, RenderedMessage, Renderer, Transcript};
pub use session::{
    ChatSession, PendingTurn, SessionMessages, TurnOutcome, DEFAULT_ERROR_MESSAGE,
    DEFAULT_GREETING,
};
pub use transport::ChatTransport;
