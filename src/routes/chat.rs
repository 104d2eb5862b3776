// src/routes/chat.rs
use std::convert::Infallible;

use axum::{
    Extension, Json,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use futures_util::{Stream, StreamExt};
use serde::Serialize;

use crate::{
    error::AppResult,
    message::{ApiResponse, ChatRequest},
    services::{
        chatgpt::{ChatReplyRequest, ModelConfig},
        token::Claims,
    },
    state::SharedState,
};

pub async fn chat_process_handler(
    State(state): State<SharedState>,
    claims: Option<Extension<Claims>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(payload) = payload?;

    if let Some(Extension(claims)) = &claims {
        tracing::debug!(user = %claims.id, "chat request");
    }

    let chunks = state.chat.reply(ChatReplyRequest {
        message: payload.prompt,
        last_context: payload.options,
        system_message: payload.system_message,
        temperature: payload.temperature,
        top_p: payload.top_p,
    });

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        delimited_json_body(chunks),
    )
        .into_response())
}

pub async fn config_handler(
    State(state): State<SharedState>,
) -> AppResult<Json<ApiResponse<ModelConfig>>> {
    let config = state.chat.config().await?;
    Ok(Json(ApiResponse::success("", Some(config))))
}

/// Serialize each item as JSON with a newline *between* items, none at the end.
/// An error item is written as a `Fail` envelope and ends the body.
pub fn delimited_json_body<S, T, E>(items: S) -> Body
where
    S: Stream<Item = Result<T, E>> + Send + 'static,
    T: Serialize + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    Body::from_stream(async_stream::stream! {
        let mut items = Box::pin(items);
        let mut separator = "";

        while let Some(item) = items.next().await {
            let (json, last) = match item.map(|chunk| serde_json::to_string(&chunk)) {
                Ok(Ok(json)) => (json, false),
                Ok(Err(err)) => (fail_json(&err), true),
                Err(err) => {
                    tracing::warn!(error = %err, "chat stream failed");
                    (fail_json(&err), true)
                }
            };

            yield Ok::<_, Infallible>(format!("{separator}{json}"));
            if last {
                break;
            }
            separator = "\n";
        }
    })
}

fn fail_json(err: &impl std::fmt::Display) -> String {
    serde_json::to_string(&ApiResponse::fail(err.to_string())).unwrap_or_default()
}
