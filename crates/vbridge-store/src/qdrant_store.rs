//! Qdrant implementation of the vector store traits
//!
//! Provides connection management and the write-side operations the bridge
//! needs against a Qdrant instance.
//!
//! Author: hephaex@gmail.com

use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use serde_json::{Map, Value};
use vbridge_core::{BridgeError, CollectionSpec, DistanceMetric, Result, StoreConfig};

/// Connector that opens a fresh Qdrant connection per logical operation
pub struct QdrantConnector {
    url: String,
}

impl QdrantConnector {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            url: config.qdrant_url.clone(),
        }
    }
}

#[async_trait]
impl super::StoreConnector for QdrantConnector {
    async fn connect(&self) -> Result<Box<dyn super::VectorStore>> {
        let client = Qdrant::from_url(&self.url)
            .build()
            .map_err(|e| BridgeError::Store(format!("Qdrant connection failed: {e}")))?;

        Ok(Box::new(QdrantStore { client }))
    }
}

/// Qdrant vector store handle with scoped lifetime.
///
/// Dropping the handle releases the underlying channel; handles are never
/// shared across requests.
pub struct QdrantStore {
    client: Qdrant,
}

fn distance_of(metric: DistanceMetric) -> Distance {
    match metric {
        DistanceMetric::Cosine => Distance::Cosine,
    }
}

#[async_trait]
impl super::VectorStore for QdrantStore {
    async fn has_collection(&self, name: &str) -> Result<bool> {
        let collections = self.client.list_collections().await.map_err(|e| {
            BridgeError::Store(format!("failed to check collection `{name}`: {e}"))
        })?;

        Ok(collections.collections.iter().any(|c| c.name == name))
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> Result<()> {
        let request = CreateCollectionBuilder::new(&spec.name).vectors_config(
            VectorParamsBuilder::new(spec.dimension as u64, distance_of(spec.metric)),
        );

        match self.client.create_collection(request).await {
            Ok(_) => Ok(()),
            // A concurrent provisioner may have won the check-then-act race;
            // an existing collection is success, not a failure.
            Err(e) if e.to_string().to_lowercase().contains("already exists") => {
                tracing::debug!(collection = %spec.name, "collection already exists");
                Ok(())
            }
            Err(e) => Err(BridgeError::Store(format!(
                "failed to create collection `{}`: {e}",
                spec.name
            ))),
        }
    }

    async fn upsert(
        &self,
        collection: &str,
        id: u64,
        vector: &[f32],
        payload: &Map<String, Value>,
    ) -> Result<()> {
        let payload_map: std::collections::HashMap<String, qdrant_client::qdrant::Value> = payload
            .iter()
            .map(|(k, v)| (k.clone(), v.clone().into()))
            .collect();

        let point = PointStruct::new(id, vector.to_vec(), payload_map);

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, vec![point]))
            .await
            .map_err(|e| BridgeError::Store(format!("failed to upsert into `{collection}`: {e}")))?;

        Ok(())
    }
}
