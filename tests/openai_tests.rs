use std::net::SocketAddr;

use axum::{
    Router,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use chat_gateway::{
    config::OpenAiConfig,
    message::{ChatContext, ChatMessage},
    services::{
        chatgpt::{ChatError, ChatProvider, ChatReplyRequest},
        openai::OpenAiProvider,
    },
};
use futures_util::StreamExt;

const COMPLETION_EVENTS: &str = concat!(
    "data: {\"id\":\"cmpl-1\",\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
    "data: {\"id\":\"cmpl-1\",\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
    ": keep-alive\n\n",
    "data: {\"id\":\"cmpl-1\",\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
    "data: [DONE]\n\n",
    "data: {\"id\":\"cmpl-1\",\"choices\":[{\"delta\":{\"content\":\" after done\"}}]}\n\n",
);

async fn completions_ok() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/event-stream")], COMPLETION_EVENTS)
}

async fn completions_bad_gateway() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, "upstream down")
}

/// Local stand-in for the completions API. Returns its address.
async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/ok/v1/chat/completions", post(completions_ok))
        .route("/bad/v1/chat/completions", post(completions_bad_gateway));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn provider(addr: SocketAddr, prefix: &str) -> OpenAiProvider {
    OpenAiProvider::new(OpenAiConfig {
        api_key: "sk-test".into(),
        model: "gpt-test".into(),
        base_url: format!("http://{addr}/{prefix}"),
        timeout_ms: 5_000,
    })
    .unwrap()
}

fn request() -> ChatReplyRequest {
    ChatReplyRequest {
        message: "hi".into(),
        last_context: ChatContext {
            conversation_id: Some("conv-9".into()),
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn reply_accumulates_text_until_done() {
    let addr = spawn_upstream().await;
    let provider = provider(addr, "ok");

    let chunks: Vec<ChatMessage> = provider
        .reply(request())
        .map(|chunk| chunk.unwrap())
        .collect()
        .await;

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "Hel");
    assert_eq!(chunks[1].text, "Hello");
    assert_eq!(chunks[1].delta.as_deref(), Some("lo"));

    for chunk in &chunks {
        assert_eq!(chunk.id, "cmpl-1");
        assert_eq!(chunk.role, "assistant");
        assert_eq!(chunk.conversation_id.as_deref(), Some("conv-9"));
    }
    assert!(chunks[0].parent_message_id.is_some());
    assert_eq!(chunks[0].parent_message_id, chunks[1].parent_message_id);
}

#[tokio::test]
async fn reply_reports_upstream_status() {
    let addr = spawn_upstream().await;
    let provider = provider(addr, "bad");

    let results: Vec<_> = provider.reply(request()).collect().await;

    assert_eq!(results.len(), 1);
    match &results[0] {
        Err(ChatError::Upstream(message)) => assert_eq!(message, "[OpenAI] Bad Gateway"),
        other => panic!("expected upstream error, got {other:?}"),
    }
}
