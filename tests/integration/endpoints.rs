//! One-shot endpoints: models, chat completions, embeddings

use super::mock_server::MockServerFixture;
use mistral_client::types::{ChatRequest, EmbeddingsRequest, Message, Role};

#[tokio::test]
async fn lists_models() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json(
            "GET",
            "/v1/models",
            200,
            r#"{"object":"list","data":[
                {"id":"mistral-large-latest","object":"model","created":1700000000,"owned_by":"mistralai"},
                {"id":"mistral-small-latest","object":"model","created":1700000001,"owned_by":"mistralai"}
            ]}"#,
        )
        .await;

    let models = fixture.client().models().await.unwrap();
    assert_eq!(
        models.ids().collect::<Vec<_>>(),
        vec!["mistral-large-latest", "mistral-small-latest"]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn one_shot_chat_completion() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            "POST",
            "/v1/chat/completions",
            200,
            r#"{"id":"r1","object":"chat.completion","created":1700000000,"model":"mistral-small-latest",
                "choices":[{"index":0,"message":{"role":"assistant","content":"Hello!"},"finish_reason":"stop"}],
                "usage":{"prompt_tokens":3,"completion_tokens":2,"total_tokens":5}}"#,
        )
        .await;

    let request = ChatRequest::new("mistral-small-latest", vec![Message::user("Hi")]);
    let response = fixture.client().chat_completions(&request).await.unwrap();

    assert_eq!(response.content(), Some("Hello!"));
    assert_eq!(response.choices[0].message.role, Some(Role::Assistant));
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(5));
}

#[tokio::test]
async fn embeddings_round_trip() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            "POST",
            "/v1/embeddings",
            200,
            r#"{"id":"e1","object":"list","model":"mistral-embed",
                "usage":{"prompt_tokens":4,"total_tokens":4},
                "data":[{"object":"embedding","embedding":[0.1,-0.2,0.3],"index":0}]}"#,
        )
        .await;

    let request = EmbeddingsRequest::new("mistral-embed", vec!["hello".into()]);
    let response = fixture.client().embeddings(&request).await.unwrap();

    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0].embedding, vec![0.1, -0.2, 0.3]);
    assert_eq!(response.usage.completion_tokens, 0);
}
