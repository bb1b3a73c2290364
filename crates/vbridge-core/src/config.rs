//! Bridge configuration management
//!
//! Handles configuration from environment variables and config files with
//! sensible defaults for development. Configuration is constructed once at
//! process start and passed explicitly to the components that need it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::CollectionTable;

/// Main bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Backing vector store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

impl BridgeConfig {
    /// Load configuration from environment variables over defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Apply environment variable overrides (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        if let Ok(host) = std::env::var("BRIDGE_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("BRIDGE_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BRIDGE_PORT".to_string(),
                value: port,
            })?;
        }
        if let Ok(url) = std::env::var("QDRANT_URL") {
            self.store.qdrant_url = url;
        }
        if let Ok(dim) = std::env::var("VECTOR_DIMENSION") {
            self.store.vector_dimension = dim.parse().map_err(|_| ConfigError::InvalidValue {
                key: "VECTOR_DIMENSION".to_string(),
                value: dim,
            })?;
        }

        Ok(self)
    }

    /// Build the collection table at this deployment's dimensionality
    pub fn collection_table(&self) -> CollectionTable {
        CollectionTable::with_dimension(self.store.vector_dimension)
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50052,
        }
    }
}

/// Backing vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Qdrant gRPC URL
    pub qdrant_url: String,

    /// Vector dimension collections are created with.
    ///
    /// A per-deployment constant, not a cross-deployment invariant: the
    /// listener deployment defaults to 3, the one-shot runner to 1.
    pub vector_dimension: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            qdrant_url: "http://localhost:6334".to_string(),
            vector_dimension: 3,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
