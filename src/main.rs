use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bean_assistant::{config::Config, routes, state::AppState};
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let state = Arc::new(AppState::from_config(&config));

    // Expired sessions are dropped in the background.
    let sessions = state.sessions.clone();
    let purge_interval = config.purge_interval.max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(purge_interval);
        loop {
            ticker.tick().await;
            let removed = sessions.purge_expired().await;
            if removed > 0 {
                debug!(removed, "purged expired sessions");
            }
        }
    });

    let app = routes::create_router(state, &config.public_dir).layer(CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!("🚀 Bean assistant running at http://{}", config.bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
