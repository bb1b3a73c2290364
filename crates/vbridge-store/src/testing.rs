//! In-memory mock backend for tests.
//!
//! Records every connection, creation, and upsert so tests can assert on the
//! exact backend traffic a front-end produces.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};
use vbridge_core::{BridgeError, CollectionSpec, Result};

use crate::{StoreConnector, VectorStore};

/// A recorded upsert call
#[derive(Debug, Clone)]
pub struct UpsertCall {
    pub collection: String,
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: Map<String, Value>,
}

#[derive(Default)]
struct Inner {
    collections: Mutex<HashSet<String>>,
    upserts: Mutex<Vec<UpsertCall>>,
    create_calls: AtomicUsize,
    connections: AtomicUsize,
    fail_create_of: Mutex<Option<String>>,
    fail_upserts: AtomicBool,
}

/// Shared mock backend; clones observe the same state
#[derive(Default, Clone)]
pub struct MockBackend {
    inner: Arc<Inner>,
}

impl MockBackend {
    /// A store handle over this backend
    pub fn store(&self) -> MockStore {
        MockStore {
            inner: self.inner.clone(),
        }
    }

    /// A connector that counts every scoped connection it hands out
    pub fn connector(&self) -> MockConnector {
        MockConnector {
            inner: self.inner.clone(),
        }
    }

    /// Pre-create a collection, as if provisioned earlier
    pub fn seed_collection(&self, name: &str) {
        self.inner
            .collections
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    pub fn has(&self, name: &str) -> bool {
        self.inner.collections.lock().unwrap().contains(name)
    }

    pub fn create_calls(&self) -> usize {
        self.inner.create_calls.load(Ordering::SeqCst)
    }

    pub fn connections(&self) -> usize {
        self.inner.connections.load(Ordering::SeqCst)
    }

    pub fn upserts(&self) -> Vec<UpsertCall> {
        self.inner.upserts.lock().unwrap().clone()
    }

    /// Make creation of the named collection fail
    pub fn fail_create_of(&self, name: &str) {
        *self.inner.fail_create_of.lock().unwrap() = Some(name.to_string());
    }

    /// Make every upsert fail
    pub fn fail_upserts(&self, fail: bool) {
        self.inner.fail_upserts.store(fail, Ordering::SeqCst);
    }

    pub fn clear_failures(&self) {
        *self.inner.fail_create_of.lock().unwrap() = None;
        self.inner.fail_upserts.store(false, Ordering::SeqCst);
    }
}

pub struct MockStore {
    inner: Arc<Inner>,
}

#[async_trait]
impl VectorStore for MockStore {
    async fn has_collection(&self, name: &str) -> Result<bool> {
        Ok(self.inner.collections.lock().unwrap().contains(name))
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> Result<()> {
        self.inner.create_calls.fetch_add(1, Ordering::SeqCst);

        if self.inner.fail_create_of.lock().unwrap().as_deref() == Some(spec.name.as_str()) {
            return Err(BridgeError::Store(format!(
                "mock refused to create `{}`",
                spec.name
            )));
        }

        self.inner
            .collections
            .lock()
            .unwrap()
            .insert(spec.name.clone());
        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        id: u64,
        vector: &[f32],
        payload: &Map<String, Value>,
    ) -> Result<()> {
        if self.inner.fail_upserts.load(Ordering::SeqCst) {
            return Err(BridgeError::Store("mock upsert failure".to_string()));
        }

        self.inner.upserts.lock().unwrap().push(UpsertCall {
            collection: collection.to_string(),
            id,
            vector: vector.to_vec(),
            payload: payload.clone(),
        });
        Ok(())
    }
}

pub struct MockConnector {
    inner: Arc<Inner>,
}

#[async_trait]
impl StoreConnector for MockConnector {
    async fn connect(&self) -> Result<Box<dyn VectorStore>> {
        self.inner.connections.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockStore {
            inner: self.inner.clone(),
        }))
    }
}
