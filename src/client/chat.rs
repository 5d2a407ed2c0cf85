//! Chat completions, one-shot and streamed.

use super::core::MistralClient;
use crate::pipeline::EventStream;
use crate::transport::TransportRequest;
use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse, ChatStreamResponse};
use crate::{Error, ErrorContext, Result};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

impl MistralClient {
    /// One-shot chat completion. `request.stream` must be unset or `false`.
    pub async fn chat_completions(&self, request: &ChatRequest) -> Result<ChatResponse> {
        if request.is_streaming() {
            return Err(stream_flag_error(
                "ChatRequest.stream cannot be set to 'true'",
                "use chat_completions_stream for streamed responses",
            ));
        }
        let body = serde_json::to_value(request)?;
        self.fetch(TransportRequest::post(CHAT_COMPLETIONS_PATH, body))
            .await
    }

    /// Streamed chat completion. `request.stream` must be `true`.
    ///
    /// ```rust,no_run
    /// use futures::StreamExt;
    /// use mistral_client::types::{ChatRequest, Message};
    /// use mistral_client::MistralClient;
    ///
    /// # async fn run() -> mistral_client::Result<()> {
    /// let client = MistralClient::new("sk-...")?;
    /// let request = ChatRequest::new("mistral-large-latest", vec![Message::user("Hi")]).stream(true);
    /// let mut stream = client.chat_completions_stream(&request).await?;
    /// while let Some(chunk) = stream.next().await {
    ///     print!("{}", chunk?.delta_content().unwrap_or_default());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn chat_completions_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<EventStream<ChatStreamResponse>> {
        if !request.is_streaming() {
            return Err(stream_flag_error(
                "ChatRequest.stream must be set to 'true'",
                "use chat_completions for one-shot responses",
            ));
        }
        let body = serde_json::to_value(request)?;
        self.open_stream::<ChatStreamResponse, ApiErrorResponse>(CHAT_COMPLETIONS_PATH, body)
            .await
    }
}

fn stream_flag_error(message: &str, hint: &str) -> Error {
    Error::request_with_context(
        message,
        ErrorContext::new()
            .with_field("request.stream")
            .with_source("chat")
            .with_hint(hint),
    )
}
