// src/services/mod.rs
pub mod chatgpt;
pub mod openai;
pub mod rate_limiter;
pub mod token;
