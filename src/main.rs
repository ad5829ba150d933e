use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskdeck::api::{build_router, AppState};
use taskdeck::config::Config;
use taskdeck::db::connection;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let conn = connection::open(&config.db)
        .with_context(|| format!("open task store at {}", config.db.display()))?;
    let state = AppState::new(conn, config.jwt_secret.as_bytes());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, db = %config.db.display(), "taskdeck listening");
    axum::serve(listener, app).await?;
    Ok(())
}
