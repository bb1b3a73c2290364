//! vbridge Core - Domain models, configuration, and shared types
//!
//! This crate defines the core abstractions used throughout the bridge:
//! - Collection specifications and the immutable collection table
//! - Inbound record and resolved write models
//! - Common error types
//! - Identifier synthesis
//! - Configuration management
//!
//! Author: hephaex@gmail.com

pub mod config;
pub mod ident;

pub use config::{BridgeConfig, ConfigError, ServerConfig, StoreConfig};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

// ============================================================================
// Collection Specifications
// ============================================================================

/// Distance metric used by a collection.
///
/// Every collection in this system is created with the same metric; the enum
/// exists so the store layer never hard-codes the backend's own constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Cosine,
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cosine => write!(f, "cosine"),
        }
    }
}

/// Specification of a single named collection in the backing store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    /// Collection name
    pub name: String,

    /// Vector dimensionality the collection is created with
    pub dimension: usize,

    /// Distance metric the collection is created with
    pub metric: DistanceMetric,
}

impl CollectionSpec {
    pub fn new(name: impl Into<String>, dimension: usize, metric: DistanceMetric) -> Self {
        Self {
            name: name.into(),
            dimension,
            metric,
        }
    }
}

/// Collection names every deployment of the bridge provisions
pub const COLLECTION_NAMES: [&str; 4] = ["sessions", "messages", "events", "errors"];

/// Ordered, immutable table of collection specifications.
///
/// Constructed once at startup and passed explicitly to the components that
/// need it; never mutated for the lifetime of the process. Iteration order is
/// declaration order, which is also provisioning order.
#[derive(Debug, Clone)]
pub struct CollectionTable {
    specs: Vec<CollectionSpec>,
}

impl CollectionTable {
    pub fn new(specs: Vec<CollectionSpec>) -> Self {
        Self { specs }
    }

    /// Build the standard table with every collection at the given dimension.
    ///
    /// Deployments differ only in dimensionality (the one-shot runner uses 1,
    /// the HTTP listener uses 3); names and metric are fixed.
    pub fn with_dimension(dimension: usize) -> Self {
        let specs = COLLECTION_NAMES
            .iter()
            .map(|name| CollectionSpec::new(*name, dimension, DistanceMetric::Cosine))
            .collect();
        Self { specs }
    }

    /// Look up a collection spec by name
    pub fn get(&self, name: &str) -> Option<&CollectionSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Iterate specs in provisioning order
    pub fn iter(&self) -> impl Iterator<Item = &CollectionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

// ============================================================================
// Record Models
// ============================================================================

/// An inbound record as handed to the upsert gateway.
///
/// The payload is an arbitrary JSON object; the bridge never imposes a schema
/// on it. `id` carries an explicit caller-supplied identifier; when absent,
/// the gateway synthesizes one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Target collection; must be a key of the collection table
    pub collection: String,

    /// Explicit identifier, if the caller supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Arbitrary JSON document forwarded to the store untouched
    pub payload: Map<String, Value>,
}

impl Record {
    pub fn new(collection: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            collection: collection.into(),
            id: None,
            payload,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

/// A fully resolved write: what was actually sent to the store.
///
/// The only materialized intermediate state in the system. The vector is
/// always all zeros, sized to the target collection's dimension.
#[derive(Debug, Clone)]
pub struct ResolvedWrite {
    pub collection: String,
    pub id: u64,
    pub ts_ms: i64,
    pub vector: Vec<f32>,
    pub payload: Map<String, Value>,
}

// ============================================================================
// Tests
// ============================================================================
