#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use chat_gateway::{
    config::{Config, OpenAiConfig},
    message::ChatMessage,
    routes::create_router,
    services::chatgpt::{ChatError, ChatProvider, ChatReplyRequest, ChatStream, ModelConfig},
    state::AppState,
};
use futures_util::stream;
use serde_json::Value;
use tower::util::ServiceExt;

pub const SECRET: &str = "test-secret";

/// Answers every prompt with a fixed list of chunks and counts calls.
pub struct FakeProvider {
    pub chunks: Vec<Result<ChatMessage, String>>,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn with_ids(ids: &[&str]) -> Self {
        Self {
            chunks: ids
                .iter()
                .map(|id| {
                    Ok(ChatMessage {
                        id: id.to_string(),
                        text: format!("text {id}"),
                        role: "assistant".into(),
                        ..Default::default()
                    })
                })
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for FakeProvider {
    fn model(&self) -> &str {
        "fake-model"
    }

    async fn config(&self) -> Result<ModelConfig, ChatError> {
        Ok(ModelConfig {
            api_model: "fake-model".into(),
            api_base_url: "http://fake".into(),
            timeout_ms: 1000,
        })
    }

    fn reply(&self, request: ChatReplyRequest) -> ChatStream {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let conversation_id = request.last_context.conversation_id;
        let items: Vec<Result<ChatMessage, ChatError>> = self
            .chunks
            .iter()
            .cloned()
            .map(|chunk| {
                chunk
                    .map(|mut msg| {
                        msg.conversation_id = conversation_id.clone();
                        msg
                    })
                    .map_err(ChatError::Upstream)
            })
            .collect();
        Box::pin(stream::iter(items))
    }
}

pub fn config(secret: Option<&str>, max_request_per_hour: u32) -> Config {
    Config {
        auth_secret_key: secret.map(str::to_string),
        max_request_per_hour,
        openai: OpenAiConfig {
            api_key: "sk-test".into(),
            model: "fake-model".into(),
            base_url: "http://fake".into(),
            timeout_ms: 1000,
        },
    }
}

pub fn app(secret: Option<&str>, max: u32, provider: Arc<FakeProvider>) -> Router {
    create_router(Arc::new(AppState::new(config(secret, max), provider)))
}

pub fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_with_token(uri: &str, body: &str, token: &str) -> Request<Body> {
    let mut req = post(uri, body);
    req.headers_mut()
        .insert("authorization", format!("Bearer {token}").parse().unwrap());
    req
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
