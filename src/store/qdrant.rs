//! Qdrant vector store backend.
//!
//! Implements [`VectorStore`] with the `qdrant-client` crate over gRPC.
//! Response errors are classified by their gRPC status code through
//! [`classify_status`]; anything else goes through [`classify_failure`].
//! Nothing from the client crate leaks upward.

use std::time::Duration;

use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, OptimizersConfigDiffBuilder, PointStruct, ScoredPoint,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant, QdrantError};
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};

use super::classify::{classify_failure, classify_status, StoreFailure, StoreResult};
use super::client::VectorStore;
use super::types::{CollectionSchema, DistanceMetric, SearchHit, StoredPoint};

/// A [`VectorStore`] backed by a Qdrant server or cloud cluster.
pub struct QdrantStore {
    client: Qdrant,
    endpoint: String,
}

impl QdrantStore {
    /// Build a client for the configured endpoint and credential.
    ///
    /// No request is sent until the first operation.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the URL cannot be parsed.
    pub fn connect(connection: &ConnectionConfig) -> Result<Self> {
        let client = Qdrant::from_url(&connection.url)
            .api_key(connection.api_key.clone())
            .timeout(Duration::from_secs(connection.timeout_secs))
            // The version probe is a network call and prints to stdout
            .skip_compatibility_check()
            .build()
            .map_err(|e| Error::Config(format!("Invalid QDRANT_URL '{}': {e}", connection.url)))?;

        Ok(Self::from_client(client, connection.url.clone()))
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn from_client(client: Qdrant, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    /// Configured endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_err(e: QdrantError) -> StoreFailure {
        match &e {
            QdrantError::ResponseError { status } => {
                classify_status(&format!("{:?}", status.code()), &e.to_string())
            }
            _ => classify_failure(&e.to_string()),
        }
    }

    fn distance(metric: DistanceMetric) -> Distance {
        match metric {
            DistanceMetric::Cosine => Distance::Cosine,
            DistanceMetric::Euclidean => Distance::Euclid,
            DistanceMetric::Dot => Distance::Dot,
        }
    }

    fn to_point(point: &StoredPoint) -> StoreResult<PointStruct> {
        let value = serde_json::to_value(&point.payload)
            .map_err(|e| StoreFailure::Unknown(format!("Failed to encode payload: {e}")))?;
        let payload = Payload::try_from(value).map_err(Self::map_err)?;

        Ok(PointStruct::new(point.id.clone(), point.vector.clone(), payload))
    }

    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn extract_u64(value: &QdrantValue) -> Option<u64> {
        match &value.kind {
            Some(Kind::IntegerValue(n)) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    fn to_hit(scored: ScoredPoint) -> SearchHit {
        let id = scored
            .id
            .as_ref()
            .and_then(|pid| match &pid.point_id_options {
                Some(PointIdOptions::Uuid(s)) => Some(s.clone()),
                Some(PointIdOptions::Num(n)) => Some(n.to_string()),
                None => None,
            })
            .unwrap_or_default();

        let field = |name: &str| scored.payload.get(name).and_then(Self::extract_string);

        SearchHit {
            id,
            score: scored.score,
            text: field("text").unwrap_or_default(),
            source: field("source").unwrap_or_default(),
            title: field("title"),
            chunk_index: scored.payload.get("chunk_index").and_then(Self::extract_u64),
        }
    }
}

impl VectorStore for QdrantStore {
    fn backend(&self) -> &'static str {
        "qdrant"
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        let response = self.client.list_collections().await.map_err(Self::map_err)?;
        Ok(response.collections.into_iter().map(|c| c.name).collect())
    }

    async fn create_collection(&self, schema: &CollectionSchema) -> StoreResult<()> {
        let request = CreateCollectionBuilder::new(schema.name.clone())
            .vectors_config(VectorParamsBuilder::new(
                schema.vector_size,
                Self::distance(schema.distance),
            ))
            .optimizers_config(
                OptimizersConfigDiffBuilder::default()
                    .default_segment_number(schema.optimizers.default_segment_number)
                    .memmap_threshold(schema.optimizers.memmap_threshold),
            )
            .replication_factor(schema.replication_factor);

        self.client.create_collection(request).await.map_err(Self::map_err)?;

        debug!(collection = %schema.name, vector_size = schema.vector_size, "created qdrant collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: &[StoredPoint]) -> StoreResult<()> {
        if points.is_empty() {
            return Ok(());
        }

        let structs = points.iter().map(Self::to_point).collect::<StoreResult<Vec<_>>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, structs).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(collection, count = points.len(), "upserted points to qdrant");
        Ok(())
    }

    async fn search(&self, collection: &str, vector: &[f32], limit: usize) -> StoreResult<Vec<SearchHit>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, vector.to_vec(), limit as u64).with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        Ok(response.result.into_iter().map(Self::to_hit).collect())
    }
}
