// src/routes/session.rs
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use chrono::DateTime;

use crate::{
    error::{AppError, AppResult},
    message::{ApiResponse, GenTokenRequest, SessionInfo, TokenResponse, VerifyRequest},
    services::token::TokenError,
    state::SharedState,
};

/// Public: tells the client whether it needs a token and which model answers.
pub async fn session_handler(State(state): State<SharedState>) -> Json<ApiResponse<SessionInfo>> {
    Json(ApiResponse::success(
        "",
        Some(SessionInfo {
            auth: state.config.has_auth(),
            model: state.chat.model().to_string(),
        }),
    ))
}

pub async fn gentoken_handler(
    State(state): State<SharedState>,
    payload: Result<Json<GenTokenRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(payload) = payload?;

    if !state.tokens.key_matches(&payload.key) {
        return Err(AppError::BadRequest("Key is invalid".to_string()));
    }
    if !state.tokens.is_enabled() {
        return Err(AppError::BadRequest("No need to set token".to_string()));
    }

    let hours = payload
        .time
        .ok_or_else(|| AppError::BadRequest("Token lifetime is invalid".to_string()))?;

    let token = state.tokens.issue(payload.user_id, hours).map_err(|err| match err {
        TokenError::InvalidLifetime => AppError::BadRequest("Token lifetime is invalid".to_string()),
        other => AppError::Internal(other.to_string()),
    })?;

    Ok(Json(TokenResponse { token }).into_response())
}

pub async fn verify_handler(
    State(state): State<SharedState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse>> {
    let Json(payload) = payload?;

    if payload.token.is_empty() {
        return Err(AppError::BadRequest("Secret key is empty".to_string()));
    }

    let claims = state.tokens.verify(&payload.token).map_err(|err| {
        tracing::info!(error = %err, "token verification failed");
        AppError::BadRequest("Secret key is invalid".to_string())
    })?;

    match DateTime::from_timestamp(claims.exp, 0) {
        Some(expires) => tracing::info!(%expires, "token verified"),
        None => tracing::info!(exp = claims.exp, "token verified"),
    }

    Ok(Json(ApiResponse::success("Verify successfully", None)))
}
