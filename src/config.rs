// src/config.rs
use std::env;

use anyhow::{Context, Result};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 100_000;

/// Upstream provider settings.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub auth_secret_key: Option<String>,
    /// Requests per client per hour on `/chat-process`. 0 disables the limit.
    pub max_request_per_hour: u32,
    pub openai: OpenAiConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = non_empty(env::var("OPENAI_API_KEY").ok())
            .context("OPENAI_API_KEY must be set")?;

        let timeout_ms = match non_empty(env::var("TIMEOUT_MS").ok()) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("TIMEOUT_MS is not a number: {raw}"))?,
            None => DEFAULT_TIMEOUT_MS,
        };

        Ok(Self {
            auth_secret_key: auth_secret(env::var("AUTH_SECRET_KEY").ok()),
            max_request_per_hour: parse_max_requests(env::var("MAX_REQUEST_PER_HOUR").ok()),
            openai: OpenAiConfig {
                api_key,
                model: non_empty(env::var("OPENAI_API_MODEL").ok())
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: non_empty(env::var("OPENAI_API_BASE_URL").ok())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout_ms,
            },
        })
    }

    /// Whether bearer tokens are enforced.
    pub fn has_auth(&self) -> bool {
        self.auth_secret_key.as_deref().is_some_and(|s| !s.is_empty())
    }
}

// Any non-empty value enables auth, whitespace included.
fn auth_secret(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// Anything that isn't a plain number means "unlimited".
fn parse_max_requests(raw: Option<String>) -> u32 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}
