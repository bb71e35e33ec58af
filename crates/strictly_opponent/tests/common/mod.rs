//! Mock chat-completion server shared by the integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strictly_opponent::LlmConfig;

/// One request as the mock server saw it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

/// A local server answering every chat completion with a canned reply.
pub struct MockServer {
    pub endpoint: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockServer {
    /// Replies with `status` and a raw `body`, after `delay`.
    pub async fn raw(status: StatusCode, body: impl Into<String>, delay: Duration) -> Self {
        let body = body.into();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let captured = requests.clone();

        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, payload: String| {
                let captured = captured.clone();
                let body = body.clone();
                async move {
                    let authorization = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    let json = serde_json::from_str(&payload).unwrap_or(serde_json::Value::Null);
                    captured.lock().unwrap().push(CapturedRequest {
                        authorization,
                        body: json,
                    });
                    tokio::time::sleep(delay).await;
                    (status, body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            endpoint: format!("http://{}/v1/chat/completions", addr),
            requests,
        }
    }

    /// Replies 200 with a well-formed completion whose content is `content`.
    pub async fn replying(content: &str) -> Self {
        let body = serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        });
        Self::raw(StatusCode::OK, body.to_string(), Duration::ZERO).await
    }

    /// Client config pointed at this server with a test credential.
    pub fn config(&self) -> LlmConfig {
        LlmConfig::new()
            .with_service_endpoint(self.endpoint.clone())
            .with_request_timeout(Duration::from_secs(5))
            .with_credential("test-key")
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}
