// src/services/chatgpt.rs
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::{ChatContext, ChatMessage};

/// Lazy, finite and non-restartable sequence of answer chunks.
pub type ChatStream = BoxStream<'static, Result<ChatMessage, ChatError>>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Upstream(String),

    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream stream broke: {0}")]
    Stream(String),

    #[error("Malformed upstream chunk: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct ChatReplyRequest {
    pub message: String,
    pub last_context: ChatContext,
    pub system_message: Option<String>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

/// What `/config` reports about the upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub api_model: String,
    pub api_base_url: String,
    pub timeout_ms: u64,
}

/// Something that can answer a prompt as a stream of chunks.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn model(&self) -> &str;

    async fn config(&self) -> Result<ModelConfig, ChatError>;

    fn reply(&self, request: ChatReplyRequest) -> ChatStream;
}
