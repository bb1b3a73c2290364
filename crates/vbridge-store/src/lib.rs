//! vbridge Store - Vector store abstraction
//!
//! Provides the abstraction over the backing vector store (Qdrant), the
//! collection provisioner, and the upsert gateway. Connections are scoped:
//! a [`StoreConnector`] hands out one store handle per logical operation,
//! and dropping the handle releases the connection on every exit path.
//!
//! Author: hephaex@gmail.com

use async_trait::async_trait;
use serde_json::{Map, Value};
use vbridge_core::{CollectionSpec, Result};

/// Trait for the consumed vector store capability.
///
/// Only the write-side surface the bridge needs: existence check, creation,
/// and upsert. There is no read-back, query, or ranking surface.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Check whether a named collection exists
    async fn has_collection(&self, name: &str) -> Result<bool>;

    /// Create a collection with the declared dimension and metric.
    ///
    /// Creation is idempotent: a collection that already exists is success,
    /// never a fatal race.
    async fn create_collection(&self, spec: &CollectionSpec) -> Result<()>;

    /// Upsert a single point. A colliding id replaces the prior record.
    async fn upsert(
        &self,
        collection: &str,
        id: u64,
        vector: &[f32],
        payload: &Map<String, Value>,
    ) -> Result<()>;
}

/// Trait for acquiring scoped store connections.
///
/// Each `connect` call yields a fresh connection; no pooling, no reuse
/// across requests. Callers drop the handle when the operation ends.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn VectorStore>>;
}

pub mod gateway;
pub mod provision;
pub mod qdrant_store;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use gateway::write;
pub use provision::{ensure_collections, ProvisionReport};
pub use qdrant_store::{QdrantConnector, QdrantStore};
