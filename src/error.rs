// src/error.rs
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ApiResponse;
use crate::services::chatgpt::ChatError;

pub type AppResult<T> = Result<T, AppError>;

/// Handler failures. Every variant is reported in the body with a 200 status;
/// clients tell success from failure by the envelope's `status` field.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Too many request from this IP in 1 hour")]
    RateLimited,

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("{0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::Unauthorized(msg) => ApiResponse::unauthorized(msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                ApiResponse::fail(msg.clone())
            }
            other => ApiResponse::fail(other.to_string()),
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}
