//! Mock HTTP server setup for integration tests

use mistral_client::MistralClient;
use mockito::{Matcher, Mock, Server, ServerGuard};

pub const TEST_KEY: &str = "sk-test";

/// Test fixture that owns a mock server speaking the `/v1` API surface
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = format!("{}/v1", server.url());
        Self { server, base_url }
    }

    /// Client pointed at the mock server, isolated from `MISTRAL_*` env vars
    pub fn client(&self) -> MistralClient {
        MistralClient::builder()
            .ignore_env()
            .api_key(TEST_KEY)
            .base_url(&self.base_url)
            .build()
            .expect("client should build")
    }

    /// Mock a 200 event-stream response whose body is the given frames
    pub async fn mock_sse_stream(&mut self, path: &str, frames: &[&str]) -> Mock {
        let body: String = frames
            .iter()
            .map(|frame| format!("data: {}\n\n", frame))
            .collect();

        self.server
            .mock("POST", path)
            .match_header("authorization", format!("Bearer {}", TEST_KEY).as_str())
            .match_header("accept", "text/event-stream")
            .match_header("x-client-request-id", Matcher::Regex("^[0-9a-f-]{36}$".into()))
            .match_body(Matcher::PartialJson(serde_json::json!({ "stream": true })))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock a JSON response
    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .match_header("authorization", format!("Bearer {}", TEST_KEY).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}
