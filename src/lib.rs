//! # Concierge
//!
//! Client for the Enterprise AI Assistant service: a chat session controller
//! that keeps the rolling conversation history, and a dashboard loader that
//! renders the service's aggregate metrics.
//!
//! ## Modules
//!
//! - [`chat`]: Session controller, history and renderer capability
//! - [`dashboard`]: Snapshot model, chart specs and chart surfaces
//! - [`markdown`]: Markdown to HTML/ANSI with highlighted code
//! - `client`: `reqwest` client for the service endpoints (native only)
//! - `config`: TOML + environment configuration (native only)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use concierge::chat::{ChatSession, Transcript};
//! use concierge::client::{AssistantClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AssistantClient::new(ClientConfig::default())?;
//!     let mut session = ChatSession::new(Transcript::new());
//!
//!     session.submit(&client, "How do I rotate my API key?", "premium", "high").await?;
//!
//!     for message in session.renderer().messages() {
//!         println!("{}: {}", message.role, message.source);
//!     }
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod dashboard;
pub mod error;
pub mod markdown;

#[cfg(not(target_arch = "wasm32"))]
pub mod client;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;

pub use chat::{
    ChatRequest, ChatResponse, ChatSession, ChatTransport, ConversationHistory, RenderedMessage,
    Renderer, Role, Transcript, Turn, TurnOutcome,
};
pub use dashboard::{ChartSpec, ChartSurface, DashboardLoader, DashboardSnapshot, DashboardSource};
pub use error::{RequestError, RequestResult, SubmitRejected};

#[cfg(not(target_arch = "wasm32"))]
pub use client::{AssistantClient, ClientConfig};
#[cfg(not(target_arch = "wasm32"))]
pub use config::{Config, ConfigError};
