//! Upsert gateway
//!
//! Accepts an inbound record, resolves its identifier, attaches the dummy
//! vector, and performs the single upsert. The gateway never provisions
//! collections: the one-shot runner provisions unconditionally before every
//! write, while the HTTP listener trusts that `/init` ran beforehand. Those
//! are two distinct policies and stay at the front-ends.

use vbridge_core::{ident, BridgeError, CollectionTable, Record, ResolvedWrite, Result};

use crate::VectorStore;

/// Write one record into its target collection.
///
/// The collection must be a key of the table; absence is a caller error and
/// no backend call is made. An explicit id wins over synthesis, and once
/// resolved the id is never recomputed within the request.
pub async fn write(
    store: &dyn VectorStore,
    table: &CollectionTable,
    record: Record,
) -> Result<ResolvedWrite> {
    let spec = table
        .get(&record.collection)
        .ok_or_else(|| BridgeError::UnknownCollection(record.collection.clone()))?;

    let (id, ts_ms) = match record.id {
        Some(id) => (id, chrono::Utc::now().timestamp_millis()),
        None => ident::synthesize_now(),
    };

    let resolved = ResolvedWrite {
        collection: spec.name.clone(),
        id,
        ts_ms,
        vector: vec![0.0; spec.dimension],
        payload: record.payload,
    };

    store
        .upsert(
            &resolved.collection,
            resolved.id,
            &resolved.vector,
            &resolved.payload,
        )
        .await?;

    tracing::debug!(
        collection = %resolved.collection,
        id = resolved.id,
        "record written"
    );

    Ok(resolved)
}
