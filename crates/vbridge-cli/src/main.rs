//! vbridge one-shot runner
//!
//! Reads exactly one request document from stdin, provisions collections,
//! performs one write with a freshly synthesized id, and prints exactly one
//! response document to stdout:
//!
//!   echo '{"collection":"sessions","payload":{"user":"a"}}' | vbridge
//!   {"ok":true,"id":6963200000003507,"ts_ms":1700000000000}
//!
//! No flags. Any failure exits non-zero with diagnostics on stderr; there is
//! no structured error response on this front-end. Logging also goes to
//! stderr so stdout stays a single JSON document.
//!
//! Author: hephaex@gmail.com

use std::io::Read;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use vbridge_core::{BridgeConfig, Record, StoreConfig};
use vbridge_store::{ensure_collections, gateway, QdrantConnector, StoreConnector};

/// The one-shot deployment provisions 1-dimensional collections
/// (`VECTOR_DIMENSION` still overrides).
const ONE_SHOT_DIMENSION: usize = 1;

/// The single request document read from stdin
#[derive(Debug, Deserialize)]
struct OneShotRequest {
    collection: String,
    payload: Map<String, Value>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vbridge=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = BridgeConfig {
        store: StoreConfig {
            vector_dimension: ONE_SHOT_DIMENSION,
            ..Default::default()
        },
        ..Default::default()
    }
    .with_env_override()?;

    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    let request: OneShotRequest = serde_json::from_str(&raw)?;

    let table = config.collection_table();
    let connector = QdrantConnector::new(&config.store);

    // One scoped connection for the whole invocation, released on every
    // exit path when the handle drops.
    let store = connector.connect().await?;

    ensure_collections(store.as_ref(), &table).await?;

    let record = Record::new(request.collection, request.payload);
    let resolved = gateway::write(store.as_ref(), &table, record).await?;

    tracing::info!(
        collection = %resolved.collection,
        id = resolved.id,
        "record written"
    );

    print!(
        "{}",
        json!({ "ok": true, "id": resolved.id, "ts_ms": resolved.ts_ms })
    );

    Ok(())
}
