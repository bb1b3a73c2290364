//! vbridge API - HTTP front-end
//!
//! A deliberately small, single-flight HTTP listener in front of the write
//! gateway: `POST /init` provisions collections, `POST /upsert` writes one
//! record, everything else is 404. Requests are processed strictly one at a
//! time, and every response carries permissive cross-origin headers for
//! browser callers.
//!
//! Author: hephaex@gmail.com

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::post, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_middleware, serialize_requests};
use crate::state::AppState;

/// Build the bridge router.
///
/// Wrong-method hits on known paths fall through to the same 404 as unknown
/// paths; OPTIONS short-circuits in the CORS middleware before routing.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/init", post(handlers::init).fallback(handlers::not_found))
        .route(
            "/upsert",
            post(handlers::upsert).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            serialize_requests,
        ))
        .layer(axum_middleware::from_fn(cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
