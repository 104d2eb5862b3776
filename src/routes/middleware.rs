// src/routes/middleware.rs
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::SharedState};

/// Bearer-token gate. A no-op when no auth secret is configured.
pub async fn auth(State(state): State<SharedState>, mut req: Request, next: Next) -> Response {
    if !state.tokens.is_enabled() {
        return next.run(req).await;
    }

    let Some(token) = bearer_token(req.headers()) else {
        return AppError::Unauthorized("Error: No token provided".to_string()).into_response();
    };

    match state.tokens.verify(token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(err) => {
            tracing::info!(error = %err, "rejected bearer token");
            AppError::Unauthorized("Error: No access rights".to_string()).into_response()
        }
    }
}

/// Per-client request cap, keyed by IP.
pub async fn rate_limit(State(state): State<SharedState>, req: Request, next: Next) -> Response {
    let key = client_key(&req);
    if !state.limiter.allow(&key) {
        tracing::warn!(client = %key, "rate limit exceeded");
        return AppError::RateLimited.into_response();
    }
    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

// One proxy hop is trusted: the right-most forwarded address is the client.
pub fn client_key(req: &Request) -> String {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.rsplit(',').map(str::trim).find(|s| !s.is_empty()));

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
