// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    Fail,
    Unauthorized,
}

/// The `{status, message, data}` envelope every non-streaming route answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    pub status: Status,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self { status: Status::Success, message: message.into(), data }
    }
}

impl ApiResponse<Value> {
    pub fn fail(message: impl Into<String>) -> Self {
        Self { status: Status::Fail, message: message.into(), data: None }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self { status: Status::Unauthorized, message: message.into(), data: None }
    }
}

/// Continuation data a client sends back from a previous answer. Only the
/// conversation id is echoed; history is not kept, so other fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    pub conversation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub prompt: String,
    #[serde(default)]
    pub options: ChatContext,
    pub system_message: Option<String>,
    pub temperature: Option<f32>,
    #[serde(rename = "top_p")]
    pub top_p: Option<f32>,
}

/// One streamed piece of an answer. `text` holds everything produced so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub role: String,
    pub parent_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub auth: bool,
    pub model: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenTokenRequest {
    #[serde(default)]
    pub key: String,
    pub time: Option<f64>,
    #[serde(default = "default_user_id")]
    pub user_id: Value,
}

fn default_user_id() -> Value {
    Value::from(1)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub token: String,
}
