// src/routes/mod.rs
pub mod chat;
pub mod middleware;
pub mod session;

use crate::state::SharedState;
use axum::{
    Router,
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    middleware::from_fn_with_state,
    routing::post,
};
use chat::{chat_process_handler, config_handler};
use session::{gentoken_handler, session_handler, verify_handler};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Full application: API routes at the root and under `/api`, static files otherwise.
pub fn create_router(state: SharedState) -> Router {
    let api = api_routes(&state);

    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .fallback_service(ServeDir::new("public"))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes(state: &SharedState) -> Router<SharedState> {
    Router::new()
        .route(
            "/chat-process",
            post(chat_process_handler)
                .route_layer(from_fn_with_state(state.clone(), middleware::rate_limit))
                .route_layer(from_fn_with_state(state.clone(), middleware::auth)),
        )
        .route(
            "/config",
            post(config_handler).route_layer(from_fn_with_state(state.clone(), middleware::auth)),
        )
        .route("/session", post(session_handler))
        .route("/gentoken", post(gentoken_handler))
        .route("/verify", post(verify_handler))
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
