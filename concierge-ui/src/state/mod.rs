//! State Management
//!
//! Chat page state and the signal-backed transcript renderer.

pub mod chat;

pub use chat::{provide_chat_state, ChatState, SharedSession, SignalRenderer, SEVERITIES, TIERS};
