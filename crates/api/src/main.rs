use std::env;

use anyhow::Result;
use scout_api::build_app;
use scout_observability::init_tracing;
use scout_service::EngineSettings;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("scout_api");

    let settings = EngineSettings::from_env();
    let bind = env::var("SCOUT_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = build_app(settings).await?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, "scout policy api started");

    axum::serve(listener, app).await?;
    Ok(())
}
