//! Listener middleware
//!
//! Author: hephaex@gmail.com

pub mod cors;
pub mod serial;

pub use cors::cors_middleware;
pub use serial::serialize_requests;
