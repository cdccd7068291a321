//! Chat endpoint request/response bodies

use serde::{Deserialize, Serialize};

use super::history::ConversationHistory;

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub tier: String,
    pub severity: String,
    pub history: ConversationHistory,
}

/// Reply of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}
