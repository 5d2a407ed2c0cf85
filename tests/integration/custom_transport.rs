//! Plugging a non-HTTP transport into the client

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use mistral_client::transport::{Transport, TransportRequest, TransportResponse};
use mistral_client::types::{ChatRequest, Message};
use mistral_client::{BoxStream, Error, MistralClient, Result};
use std::sync::{Arc, Mutex};

/// Replays a fixed body split into the given reads and records requests.
struct ReplayTransport {
    reads: Vec<&'static str>,
    seen: Mutex<Vec<TransportRequest>>,
}

#[async_trait]
impl Transport for ReplayTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.seen.lock().unwrap().push(request);
        Ok(TransportResponse {
            status: 404,
            body: Bytes::from_static(b"{\"message\":\"not here\"}"),
        })
    }

    async fn open_stream(&self, request: TransportRequest) -> Result<BoxStream<'static, Bytes>> {
        self.seen.lock().unwrap().push(request);
        let reads: Vec<Result<Bytes>> = self
            .reads
            .iter()
            .copied()
            .map(|r| Ok(Bytes::from_static(r.as_bytes())))
            .collect();
        Ok(Box::pin(futures::stream::iter(reads)))
    }
}

#[tokio::test]
async fn frames_split_across_reads_are_reassembled() {
    let transport = Arc::new(ReplayTransport {
        reads: vec![
            "data: {\"id\":\"x\",\"model\":\"m\",\"choi",
            "ces\":[{\"index\":0,\"delta\":{\"content\":\"caf\u{e9}\"}}]}\n\nda",
            "ta: [DONE]\n\n",
        ],
        seen: Mutex::new(Vec::new()),
    });
    let client = MistralClient::builder()
        .ignore_env()
        .api_key("sk-local")
        .transport(transport.clone())
        .build()
        .unwrap();

    let request = ChatRequest::new("m", vec![Message::user("hi")]).stream(true);
    let chunks: Vec<_> = client
        .chat_completions_stream(&request)
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].as_ref().unwrap().delta_content(), Some("caf\u{e9}"));

    let seen = transport.seen.lock().unwrap();
    assert_eq!(seen[0].path, "chat/completions");
    assert_eq!(seen[0].bearer_token.as_deref(), Some("sk-local"));
    assert!(seen[0].request_id.is_some());
}

#[tokio::test]
async fn one_shot_errors_come_from_the_transport_response() {
    let transport = Arc::new(ReplayTransport {
        reads: vec![],
        seen: Mutex::new(Vec::new()),
    });
    let client = MistralClient::builder()
        .ignore_env()
        .api_key("sk-local")
        .transport(transport)
        .build()
        .unwrap();

    let err = client.models().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Remote { status: 404, ref message } if message == "not here"
    ));
}
