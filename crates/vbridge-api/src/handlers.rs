//! Route handlers
//!
//! Both write routes open their own scoped backend connection and drop it on
//! every exit path. `/upsert` assumes `/init` already ran; it never
//! re-provisions, so a skipped `/init` surfaces as a backend failure.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json,
};
use serde_json::{json, Value};
use vbridge_core::Record;
use vbridge_store::{ensure_collections, gateway};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /init` - provision every collection in the table. Body is ignored.
pub async fn init(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let store = state.connector.connect().await?;
    let report = ensure_collections(store.as_ref(), &state.table).await?;

    tracing::info!(
        checked = report.checked,
        created = report.created,
        "collections provisioned"
    );

    Ok(Json(json!({ "ok": true })))
}

/// `POST /upsert` - write exactly one record. No provisioning on this path.
pub async fn upsert(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))?;

    let collection = request
        .get("collection")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::bad_request("missing field `collection`"))?
        .to_string();

    let mut payload = request
        .get("payload")
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| ApiError::bad_request("missing field `payload`"))?;

    // A payload without an identifying field writes to a single shared
    // sentinel record (id 0) instead of failing. Explicit-id path either
    // way; this route never synthesizes.
    let id = payload
        .entry("_id")
        .or_insert(json!(0))
        .as_u64()
        .ok_or_else(|| ApiError::bad_request("field `_id` must be an unsigned integer"))?;

    let record = Record::new(collection, payload).with_id(id);

    let store = state.connector.connect().await?;
    let resolved = gateway::write(store.as_ref(), &state.table, record).await?;

    tracing::debug!(
        collection = %resolved.collection,
        id = resolved.id,
        "upsert complete"
    );

    Ok(Json(json!({ "ok": true })))
}

/// Fallback for unknown paths and wrong methods
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
