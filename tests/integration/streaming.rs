//! Streaming chat completions over HTTP

use super::mock_server::MockServerFixture;
use futures::StreamExt;
use mistral_client::types::{ChatRequest, FinishReason, Message};
use mistral_client::{Error, StreamState};

const CHAT_PATH: &str = "/v1/chat/completions";

fn request() -> ChatRequest {
    ChatRequest::new("mistral-small-latest", vec![Message::user("Say hello")]).stream(true)
}

#[tokio::test]
async fn streams_deltas_until_done() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_sse_stream(
            CHAT_PATH,
            &[
                r#"{"id":"c1","object":"chat.completion.chunk","created":1700000000,"model":"mistral-small-latest","choices":[{"index":0,"delta":{"role":"assistant","content":""}}]}"#,
                r#"{"id":"c1","object":"chat.completion.chunk","created":1700000000,"model":"mistral-small-latest","choices":[{"index":0,"delta":{"content":"Hello"}}]}"#,
                r#"{"id":"c1","object":"chat.completion.chunk","created":1700000000,"model":"mistral-small-latest","choices":[{"index":0,"delta":{"content":" there"},"finish_reason":"stop"}],"usage":{"prompt_tokens":5,"completion_tokens":2,"total_tokens":7}}"#,
                "[DONE]",
            ],
        )
        .await;

    let client = fixture.client();
    let mut stream = client.chat_completions_stream(&request()).await.unwrap();

    let mut text = String::new();
    let mut last = None;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.unwrap();
        text.push_str(chunk.delta_content().unwrap_or_default());
        last = Some(chunk);
    }

    assert_eq!(text, "Hello there");
    let last = last.unwrap();
    assert_eq!(last.choices[0].finish_reason, Some(FinishReason::Stop));
    assert_eq!(last.usage.map(|u| u.total_tokens), Some(7));
    assert_eq!(stream.state(), StreamState::Completed);
    mock.assert_async().await;
}

#[tokio::test]
async fn error_envelope_inside_stream_is_surfaced() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_sse_stream(
            CHAT_PATH,
            &[
                r#"{"id":"c2","model":"mistral-small-latest","choices":[{"index":0,"delta":{"content":"Hi"}}]}"#,
                r#"{"detail":{"loc":["body","messages"],"msg":"Context length exceeded","type":"invalid_request_error"}}"#,
            ],
        )
        .await;

    let client = fixture.client();
    let mut stream = client.chat_completions_stream(&request()).await.unwrap();

    assert_eq!(
        stream.next().await.unwrap().unwrap().delta_content(),
        Some("Hi")
    );
    match stream.next().await {
        Some(Err(Error::Api(detail))) => {
            assert_eq!(detail.msg, "Context length exceeded");
            assert_eq!(detail.loc.len(), 2);
        }
        _ => panic!("expected an API error"),
    }
    assert!(stream.next().await.is_none());
    assert_eq!(stream.state(), StreamState::Failed);
}

#[tokio::test]
async fn non_success_status_fails_before_streaming() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            "POST",
            CHAT_PATH,
            401,
            r#"{"object":"error","message":"Unauthorized","type":"invalid_request_error"}"#,
        )
        .await;

    let client = fixture.client();
    let err = client
        .chat_completions_stream(&request())
        .await
        .err()
        .expect("401 should fail the call");
    match err {
        Error::Remote { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn cancelling_mid_stream_yields_nothing_further() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_sse_stream(
            CHAT_PATH,
            &[
                r#"{"id":"c3","model":"m","choices":[{"index":0,"delta":{"content":"a"}}]}"#,
                r#"{"id":"c3","model":"m","choices":[{"index":0,"delta":{"content":"b"}}]}"#,
                "[DONE]",
            ],
        )
        .await;

    let client = fixture.client();
    let mut stream = client.chat_completions_stream(&request()).await.unwrap();
    assert!(stream.next().await.unwrap().is_ok());

    stream.cancel();
    assert!(stream.next().await.is_none());
    assert_eq!(stream.state(), StreamState::Cancelled);
}
