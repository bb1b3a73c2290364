//! Single-flight request gate
//!
//! The listener processes requests one at a time: the gate is held from
//! before routing until the response is written. No two requests are ever
//! mid-flight concurrently within this process, which also serializes the
//! provisioning check-then-act without any locking in the provisioner.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

pub async fn serialize_requests(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let _guard = state.begin_request().await;
    next.run(request).await
}
