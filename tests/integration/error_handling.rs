//! Error mapping for one-shot calls and request validation

use super::mock_server::MockServerFixture;
use mistral_client::types::{ChatRequest, Message};
use mistral_client::{Error, MistralClient};

#[tokio::test]
async fn missing_api_key_fails_without_a_request() {
    let client = MistralClient::builder()
        .ignore_env()
        .base_url("http://127.0.0.1:9/v1")
        .build()
        .unwrap();

    match client.models().await {
        Err(Error::Request { message, context }) => {
            assert_eq!(message, "Missing API key");
            assert_eq!(context.field.as_deref(), Some("config.api_key"));
        }
        other => panic!("expected missing key error, got {:?}", other),
    }
}

#[tokio::test]
async fn stream_flag_must_match_the_call() {
    let fixture = MockServerFixture::new().await;
    let client = fixture.client();

    let streamed = ChatRequest::new("m", vec![Message::user("hi")]).stream(true);
    let err = client.chat_completions(&streamed).await.unwrap_err();
    assert!(err.to_string().contains("ChatRequest.stream cannot be set to 'true'"));

    let one_shot = ChatRequest::new("m", vec![Message::user("hi")]);
    let err = client
        .chat_completions_stream(&one_shot)
        .await
        .err()
        .expect("unset stream flag should be rejected");
    assert!(err.to_string().contains("ChatRequest.stream must be set to 'true'"));
    assert_eq!(
        err.context().and_then(|c| c.field.as_deref()),
        Some("request.stream")
    );
}

#[tokio::test]
async fn error_detail_becomes_remote_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            "POST",
            "/v1/chat/completions",
            422,
            r#"{"detail":{"loc":["body","model"],"msg":"Invalid model: nope","type":"invalid_model"}}"#,
        )
        .await;

    let request = ChatRequest::new("nope", vec![Message::user("hi")]);
    let err = fixture.client().chat_completions(&request).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Remote { status: 422, ref message } if message == "Invalid model: nope"
    ));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn unparseable_server_error_is_retryable() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("GET", "/v1/models", 503, "<html>upstream unavailable</html>")
        .await;

    let err = fixture.client().models().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Remote { status: 503, ref message } if message == "Unknown response error"
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unexpected_success_body_is_a_decode_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("GET", "/v1/models", 200, r#"{"object":"list"}"#)
        .await;

    let err = fixture.client().models().await.unwrap_err();
    assert!(matches!(err, Error::Decode { status: 200, .. }));
}
