//! Application state management
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use vbridge_core::{BridgeConfig, CollectionTable};
use vbridge_store::StoreConnector;

/// State shared across handlers.
///
/// The collection table is built once from the configuration and never
/// mutated afterwards. The connector hands out one scoped backend connection
/// per request; nothing here pools or reuses them.
pub struct AppState {
    /// Bridge configuration
    pub config: BridgeConfig,
    /// Immutable collection table for this deployment
    pub table: CollectionTable,
    /// Backend connection factory
    pub connector: Arc<dyn StoreConnector>,
    /// Single-flight gate; see [`AppState::begin_request`]
    gate: Mutex<()>,
}

impl AppState {
    pub fn new(config: BridgeConfig, connector: Arc<dyn StoreConnector>) -> Self {
        let table = config.collection_table();
        Self {
            config,
            table,
            connector,
            gate: Mutex::new(()),
        }
    }

    /// Acquire the single-flight gate for the duration of a request.
    ///
    /// The listener handles requests strictly one at a time: holding the
    /// guard across the whole request serializes the check-then-act
    /// provisioning path and every backend round-trip. One slow backend call
    /// stalls all other clients, which is the accepted trade.
    pub async fn begin_request(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }
}
