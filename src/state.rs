// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::chatgpt::ChatProvider;
use crate::services::rate_limiter::RateLimiter;
use crate::services::token::TokenService;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub tokens: TokenService,
    pub limiter: RateLimiter,
    pub chat: Arc<dyn ChatProvider>,
}

impl AppState {
    pub fn new(config: Config, chat: Arc<dyn ChatProvider>) -> Self {
        Self {
            tokens: TokenService::new(config.auth_secret_key.clone()),
            limiter: RateLimiter::per_hour(config.max_request_per_hour),
            config,
            chat,
        }
    }
}
