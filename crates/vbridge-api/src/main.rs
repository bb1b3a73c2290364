//! vbridge API Server
//!
//! Long-lived HTTP front-end of the bridge. Binds the configured port and
//! serves `/init` and `/upsert` against the configured Qdrant instance.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use vbridge_api::{create_router, state::AppState};
use vbridge_core::BridgeConfig;
use vbridge_store::QdrantConnector;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vbridge_api=debug,tower_http=debug".into()),
        )
        .init();

    let config = BridgeConfig::from_env()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let store_url = config.store.qdrant_url.clone();

    let connector = Arc::new(QdrantConnector::new(&config.store));
    let state = Arc::new(AppState::new(config, connector));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("bridge listening on http://{addr}; store at {store_url}");

    axum::serve(listener, app).await?;

    Ok(())
}
