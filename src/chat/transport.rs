//! Chat transport seam

use async_trait::async_trait;

use super::dto::{ChatRequest, ChatResponse};
use crate::error::RequestResult;

/// Something that can deliver a chat request and return the reply.
///
/// Implementations make exactly one attempt and bound it with a timeout;
/// any failure (status, transport, timeout, decoding) is returned as an error.
/// Not `Send`: the browser transport lives on the single UI thread.
#[async_trait(?Send)]
pub trait ChatTransport {
    async fn send(&self, request: &ChatRequest) -> RequestResult<ChatResponse>;
}
