//! HTTP API Client
//!
//! Browser transport for the assistant service. Requests race a timer so a
//! stalled server surfaces as [`RequestError::Timeout`].

use async_trait::async_trait;
use futures_util::future::{select, Either};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use std::future::Future;

use concierge::chat::{ChatRequest, ChatResponse, ChatTransport};
use concierge::dashboard::{DashboardSnapshot, DashboardSource};
use concierge::error::{RequestError, RequestResult};

/// Default API base URL: the origin that served the page
pub const DEFAULT_API_BASE: &str = "";

/// Per-request timeout
pub const DEFAULT_TIMEOUT_MS: u32 = 30_000;

const API_BASE_KEY: &str = "concierge_api_url";
const CHAT_PATH: &str = "/chat";
const DASHBOARD_PATH: &str = "/api/dashboard_data";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_BASE_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    normalize_base(&url)
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(API_BASE_KEY, &normalize_base(url));
        }
    }
}

fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// `gloo-net` transport for `/chat` and `/api/dashboard_data`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base: String,
    timeout_ms: u32,
}

impl HttpTransport {
    pub fn new(base: &str, timeout_ms: u32) -> Self {
        Self {
            base: normalize_base(base),
            timeout_ms,
        }
    }

    /// Transport for the address saved in local storage
    pub fn from_storage() -> Self {
        Self::new(&get_api_base(), DEFAULT_TIMEOUT_MS)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn chat(&self, request: &ChatRequest) -> RequestResult<ChatResponse> {
        let url = self.url(CHAT_PATH);
        let call = async {
            let response = Request::post(&url)
                .json(request)
                .map_err(|e| RequestError::Transport(e.to_string()))?
                .send()
                .await
                .map_err(|e| RequestError::Unavailable(e.to_string()))?;
            read_json(response).await
        };
        with_timeout(call, self.timeout_ms).await
    }

    pub async fn dashboard_data(&self) -> RequestResult<DashboardSnapshot> {
        let url = self.url(DASHBOARD_PATH);
        let call = async {
            let response = Request::get(&url)
                .send()
                .await
                .map_err(|e| RequestError::Unavailable(e.to_string()))?;
            read_json(response).await
        };
        with_timeout(call, self.timeout_ms).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> RequestResult<T> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(RequestError::Status { status, body });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| RequestError::Decode(e.to_string()))
}

async fn with_timeout<F, T>(call: F, timeout_ms: u32) -> RequestResult<T>
where
    F: Future<Output = RequestResult<T>>,
{
    let call = Box::pin(call);
    let timer = Box::pin(TimeoutFuture::new(timeout_ms));

    match select(call, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(RequestError::Timeout),
    }
}

#[async_trait(?Send)]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> RequestResult<ChatResponse> {
        self.chat(request).await
    }
}

#[async_trait(?Send)]
impl DashboardSource for HttpTransport {
    async fn fetch_snapshot(&self) -> RequestResult<DashboardSnapshot> {
        self.dashboard_data().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_origin_paths() {
        let transport = HttpTransport::new(DEFAULT_API_BASE, DEFAULT_TIMEOUT_MS);
        assert_eq!(transport.url(CHAT_PATH), "/chat");
        assert_eq!(transport.url(DASHBOARD_PATH), "/api/dashboard_data");
    }

    #[test]
    fn test_base_is_normalized() {
        let transport = HttpTransport::new(" http://assist.local:5000/ ", 1000);
        assert_eq!(transport.url(CHAT_PATH), "http://assist.local:5000/chat");
    }

    #[cfg(target_arch = "wasm32")]
    mod browser {
        use super::*;
        use wasm_bindgen_test::*;

        wasm_bindgen_test_configure!(run_in_browser);

        #[wasm_bindgen_test]
        async fn test_stalled_call_times_out() {
            let stalled = async {
                TimeoutFuture::new(1_000).await;
                Ok::<(), RequestError>(())
            };
            assert_eq!(with_timeout(stalled, 10).await, Err(RequestError::Timeout));
        }

        #[wasm_bindgen_test]
        async fn test_fast_call_wins() {
            let fast = async { Ok::<u32, RequestError>(7) };
            assert_eq!(with_timeout(fast, 1_000).await, Ok(7));
        }
    }
}
