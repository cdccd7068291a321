//! Assistant Service HTTP Client
//!
//! Native client for the `/chat` and `/api/dashboard_data` endpoints.
//! Every call is a single attempt bounded by the configured timeout.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::chat::{ChatRequest, ChatResponse, ChatTransport};
use crate::dashboard::{DashboardSnapshot, DashboardSource};
use crate::error::{RequestError, RequestResult};

/// Path of the chat endpoint
pub const CHAT_PATH: &str = "/chat";
/// Path of the dashboard snapshot endpoint
pub const DASHBOARD_PATH: &str = "/api/dashboard_data";

/// Configuration for the service client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the assistant service (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// HTTP client for the assistant service
pub struct AssistantClient {
    client: Client,
    config: ClientConfig,
}

impl AssistantClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> RequestResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Post a query with its conversation history
    pub async fn chat(&self, request: &ChatRequest) -> RequestResult<ChatResponse> {
        let url = self.url(CHAT_PATH);
        tracing::debug!(url = %url, turns = request.history.len(), "POST chat");

        let response = self.client.post(&url).json(request).send().await?;
        read_json(response).await
    }

    /// Fetch the aggregate metrics snapshot
    pub async fn dashboard_data(&self) -> RequestResult<DashboardSnapshot> {
        let url = self.url(DASHBOARD_PATH);
        tracing::debug!(url = %url, "GET dashboard data");

        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> RequestResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RequestError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response.json().await.map_err(|e| {
        if e.is_timeout() {
            RequestError::Timeout
        } else {
            RequestError::Decode(e.to_string())
        }
    })
}

#[async_trait(?Send)]
impl ChatTransport for AssistantClient {
    async fn send(&self, request: &ChatRequest) -> RequestResult<ChatResponse> {
        self.chat(request).await
    }
}

#[async_trait(?Send)]
impl DashboardSource for AssistantClient {
    async fn fetch_snapshot(&self) -> RequestResult<DashboardSnapshot> {
        self.dashboard_data().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatSession, ConversationHistory, Transcript, Turn, TurnOutcome};
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String, request_timeout_ms: u64) -> AssistantClient {
        AssistantClient::new(ClientConfig {
            base_url,
            request_timeout_ms,
        })
        .unwrap()
    }

    /// Replies with the query, tier and number of history turns it received
    fn echo_router() -> Router {
        Router::new().route(
            CHAT_PATH,
            post(|Json(body): Json<Value>| async move {
                let turns = body["history"].as_array().map(|h| h.len()).unwrap_or(0);
                Json(json!({
                    "response": format!(
                        "{} [{}] ({} turns)",
                        body["query"].as_str().unwrap_or(""),
                        body["tier"].as_str().unwrap_or(""),
                        turns
                    )
                }))
            }),
        )
    }

    fn request(query: &str) -> ChatRequest {
        let mut history = ConversationHistory::new();
        history.push(Turn::user(query));
        ChatRequest {
            query: query.to_string(),
            tier: "free".to_string(),
            severity: "low".to_string(),
            history,
        }
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = client("http://example.test/".to_string(), 1000);
        assert_eq!(client.url(CHAT_PATH), "http://example.test/chat");
        assert_eq!(client.url(DASHBOARD_PATH), "http://example.test/api/dashboard_data");
    }

    #[tokio::test]
    async fn test_chat_roundtrip() {
        let base = spawn_stub(echo_router()).await;
        let client = client(base, 5000);

        let reply = client.chat(&request("ping")).await.unwrap();
        assert_eq!(reply.response, "ping [free] (1 turns)");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let router = Router::new().route(
            CHAT_PATH,
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "agent unavailable") }),
        );
        let base = spawn_stub(router).await;

        let err = client(base, 5000).chat(&request("ping")).await.unwrap_err();
        assert_eq!(
            err,
            RequestError::Status {
                status: 500,
                body: "agent unavailable".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_bad_body_is_decode_error() {
        let router = Router::new().route(CHAT_PATH, post(|| async { Json(json!({"error": "?"})) }));
        let base = spawn_stub(router).await;

        let err = client(base, 5000).chat(&request("ping")).await.unwrap_err();
        assert!(matches!(err, RequestError::Decode(_)));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let router = Router::new().route(
            CHAT_PATH,
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"response": "too late"}))
            }),
        );
        let base = spawn_stub(router).await;

        let err = client(base, 100).chat(&request("ping")).await.unwrap_err();
        assert_eq!(err, RequestError::Timeout);
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}", addr), 1000)
            .chat(&request("ping"))
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_dashboard_data() {
        let router = Router::new().route(
            DASHBOARD_PATH,
            get(|| async {
                Json(json!({
                    "time_series": {
                        "labels": ["Oct 12", "Oct 13"],
                        "total_requests": [812, 1490],
                        "avg_response_time": [0.51, 2.3],
                        "success_rate": [99.5, 96.0]
                    },
                    "tier_distribution": {"Free": 6000, "Premium": 2500, "Enterprise": 900},
                    "severity_distribution": {"Low": 7000, "Medium": 2000, "High": 300}
                }))
            }),
        );
        let base = spawn_stub(router).await;

        let snapshot = client(base, 5000).dashboard_data().await.unwrap();
        assert_eq!(snapshot.time_series.labels, vec!["Oct 12", "Oct 13"]);
        assert_eq!(snapshot.tier_distribution.len(), 3);
        assert_eq!(snapshot.severity_distribution["High"], 300.0);
    }

    #[tokio::test]
    async fn test_session_over_http() {
        let base = spawn_stub(echo_router()).await;
        let client = client(base, 5000);
        let mut session = ChatSession::new(Transcript::new());

        let first = session.submit(&client, "hello", "premium", "low").await;
        let second = session.submit(&client, "again", "premium", "low").await;

        assert_eq!(first, Ok(TurnOutcome::Replied));
        assert_eq!(second, Ok(TurnOutcome::Replied));
        assert_eq!(session.history().len(), 4);
        assert_eq!(
            session.history().last().unwrap().content,
            "again [premium] (3 turns)"
        );
    }
}
