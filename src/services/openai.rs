// src/services/openai.rs
use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::chatgpt::{ChatError, ChatProvider, ChatReplyRequest, ChatStream, ModelConfig};
use crate::config::OpenAiConfig;
use crate::message::ChatMessage;

/// Chat provider speaking the OpenAI chat completions protocol.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn request_body(&self, request: &ChatReplyRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = request.system_message.as_deref().filter(|s| !s.is_empty()) {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": request.message }));

        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
            "stream": true,
        });
        if let Some(t) = request.temperature {
            body["temperature"] = json!(t);
        }
        if let Some(p) = request.top_p {
            body["top_p"] = json!(p);
        }
        body
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn config(&self) -> Result<ModelConfig, ChatError> {
        Ok(ModelConfig {
            api_model: self.config.model.clone(),
            api_base_url: self.config.base_url.clone(),
            timeout_ms: self.config.timeout_ms,
        })
    }

    fn reply(&self, request: ChatReplyRequest) -> ChatStream {
        let client = self.client.clone();
        let url = self.completions_url();
        let api_key = self.config.api_key.clone();
        let body = self.request_body(&request);
        let conversation_id = request.last_context.conversation_id;
        let parent_message_id = Uuid::new_v4().to_string();

        Box::pin(async_stream::try_stream! {
            let response = open_stream(&client, &url, &api_key, &body).await?;
            let mut events = response.bytes_stream().eventsource();
            let mut text = String::new();

            while let Some(event) = events.next().await {
                let event = event.map_err(|err| ChatError::Stream(err.to_string()))?;
                match parse_event_data(&event.data)? {
                    SseData::Skip => {}
                    SseData::Done => break,
                    SseData::Chunk { chunk, raw } => {
                        let Some(delta) = chunk.content() else { continue };
                        text.push_str(&delta);
                        yield ChatMessage {
                            id: chunk.id,
                            text: text.clone(),
                            role: "assistant".to_string(),
                            parent_message_id: Some(parent_message_id.clone()),
                            conversation_id: conversation_id.clone(),
                            delta: Some(delta),
                            detail: Some(raw),
                        };
                    }
                }
            }
        })
    }
}

async fn open_stream(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    body: &Value,
) -> Result<reqwest::Response, ChatError> {
    let response = client.post(url).bearer_auth(api_key).json(body).send().await?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response.text().await.unwrap_or_default();
    tracing::warn!(%status, "upstream rejected completion request");
    Err(ChatError::Upstream(upstream_error_message(status.as_u16(), &detail)))
}

#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    id: String,
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

impl CompletionChunk {
    fn content(&self) -> Option<String> {
        let content: String = self
            .choices
            .iter()
            .filter_map(|c| c.delta.content.as_deref())
            .collect();
        (!content.is_empty()).then_some(content)
    }
}

#[derive(Debug)]
enum SseData {
    Skip,
    Done,
    Chunk { chunk: CompletionChunk, raw: Value },
}

fn parse_event_data(data: &str) -> Result<SseData, ChatError> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(SseData::Skip);
    }
    if data == "[DONE]" {
        return Ok(SseData::Done);
    }

    let raw: Value = serde_json::from_str(data)?;
    let chunk: CompletionChunk = serde_json::from_value(raw.clone())?;
    Ok(SseData::Chunk { chunk, raw })
}

fn upstream_error_message(status: u16, detail: &str) -> String {
    match status {
        401 => "[OpenAI] Incorrect API key provided".to_string(),
        403 => "[OpenAI] Server refused to access, please try again later".to_string(),
        429 => "[OpenAI] Server overloaded, please try again later".to_string(),
        500 => "[OpenAI] Internal Server Error".to_string(),
        502 => "[OpenAI] Bad Gateway".to_string(),
        503 => "[OpenAI] Server is busy, please try again later".to_string(),
        504 => "[OpenAI] Gateway Time-out".to_string(),
        _ => format!("[OpenAI] {status}: {detail}"),
    }
}
