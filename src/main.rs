use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use chat_gateway::{
    config::Config, routes, services::openai::OpenAiProvider, state::AppState,
};
use tracing_subscriber::EnvFilter;

const PORT: u16 = 3002;
const LIMITER_PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chat_gateway=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let provider = OpenAiProvider::new(config.openai.clone())
        .context("failed to build upstream HTTP client")?;

    tracing::info!(
        model = %config.openai.model,
        auth = config.has_auth(),
        max_request_per_hour = config.max_request_per_hour,
        "configuration loaded"
    );

    let state = Arc::new(AppState::new(config, Arc::new(provider)));

    if !state.limiter.is_unlimited() {
        let limiter = state.limiter.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(LIMITER_PURGE_INTERVAL);
            loop {
                tick.tick().await;
                let removed = limiter.purge_expired();
                if removed > 0 {
                    tracing::debug!(removed, "purged idle rate limit clients");
                }
            }
        });
    }

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", PORT))
        .await
        .with_context(|| format!("failed to bind port {PORT}"))?;

    tracing::info!("Server is running on port {PORT}");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
