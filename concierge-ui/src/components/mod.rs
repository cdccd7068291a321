//! UI Components
//!
//! Reusable Leptos components for the chat and dashboard pages.

pub mod chart;
pub mod message;
pub mod nav;

pub use chart::{CanvasSurface, ChartCanvas};
pub use message::{MessageBubble, TypingIndicator};
pub use nav::Nav;
