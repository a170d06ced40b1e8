use anyhow::{anyhow, Context};
use clap::Parser;
use heads_server::config::ServerConfig;
use heads_server::routes::{build_router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::parse();

    // Validate configuration before starting
    config
        .validate()
        .map_err(|e| anyhow!("Invalid server configuration: {}", e))?;

    if !config.public_dir.is_dir() {
        tracing::warn!(
            "Public directory {} does not exist; only the API routes will answer",
            config.public_dir.display()
        );
    }

    let listen_addr = config.listen_addr();
    let port = config.port;
    let app = build_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("bind {}", listen_addr))?;
    tracing::info!("Server running: http://localhost:{}", port);

    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}
