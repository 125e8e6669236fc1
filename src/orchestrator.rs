//! Retrieval orchestrator.
//!
//! Composes the embedding gateway, collection provisioner and vector store.
//! Every failure leaving this module is an [`Error`] with one of the five
//! outward kinds; store failures never escape unclassified.
//!
//! ```text
//!   ensure_collection_ready(name) ──► CollectionProvisioner ──► VectorStore
//!   embed(text) ────────────────────► EmbeddingGateway ──────► provider
//!   add_document / search ──────────► both of the above
//! ```

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use crate::embeddings::{chunk_text, ChunkConfig, EmbeddingGateway, EmbeddingProvider};
use crate::error::{Error, Result};
use crate::store::{
    CollectionProvisioner, CollectionSettings, DocumentPayload, Provisioned, SearchHit,
    StoredPoint, VectorStore,
};

/// A document to index.
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    /// Where the text came from (URL or path). Part of each point id.
    pub source: String,
    pub title: Option<String>,
}

/// Result of [`RetrievalOrchestrator::add_document`].
#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    pub collection: String,
    pub source: String,
    pub chunks: usize,
    pub point_ids: Vec<String>,
}

/// Owns one embedding gateway and one store for the process lifetime.
pub struct RetrievalOrchestrator<P, S> {
    embeddings: EmbeddingGateway<P>,
    store: S,
    collection: CollectionSettings,
}

impl<P: EmbeddingProvider, S: VectorStore> RetrievalOrchestrator<P, S> {
    /// # Errors
    ///
    /// Returns `Error::Config` for invalid collection settings, or
    /// `Error::DimensionMismatch` if the collection vector size differs
    /// from the embedding dimensions. Both are raised before any I/O.
    pub fn new(
        embeddings: EmbeddingGateway<P>,
        store: S,
        collection: CollectionSettings,
    ) -> Result<Self> {
        collection.validate()?;

        let dimensions = embeddings.dimensions();
        if collection.vector_size != dimensions as u64 {
            return Err(Error::DimensionMismatch {
                vector_size: collection.vector_size,
                dimensions,
            });
        }

        Ok(Self { embeddings, store, collection })
    }

    #[must_use]
    pub fn embeddings(&self) -> &EmbeddingGateway<P> {
        &self.embeddings
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn collection_settings(&self) -> &CollectionSettings {
        &self.collection
    }

    /// Make sure `name` exists, reporting how.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty name or one with surrounding
    /// whitespace; otherwise the classified store failure (`Unauthorized`,
    /// `Unreachable`, or `CollectionInit`).
    pub async fn ensure_collection(&self, name: &str) -> Result<Provisioned> {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument("collection name must not be empty".into()));
        }
        // Names are used verbatim; a padded name would be a different collection.
        if name.trim() != name {
            return Err(Error::InvalidArgument(format!(
                "collection name '{name}' must not have leading or trailing whitespace"
            )));
        }

        let schema = self.collection.schema(name);
        CollectionProvisioner::new(&self.store)
            .ensure(&schema)
            .await
            .map_err(|failure| Error::provisioning(name, failure))
    }

    /// Succeeds only once `name` provably exists on the store.
    ///
    /// # Errors
    ///
    /// Same as [`RetrievalOrchestrator::ensure_collection`].
    pub async fn ensure_collection_ready(&self, name: &str) -> Result<()> {
        self.ensure_collection(name).await.map(|_| ())
    }

    /// Embed one text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Embedding` on any provider failure or wrong length.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embeddings.embed(text).await
    }

    /// Chunk, embed and upsert a document. Re-adding the same document
    /// overwrites its points.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for empty text or source, then any provisioning,
    /// embedding or store failure.
    pub async fn add_document(&self, collection: &str, document: &Document) -> Result<IndexReport> {
        if document.source.trim().is_empty() {
            return Err(Error::InvalidArgument("document source must not be empty".into()));
        }

        let chunk_config = ChunkConfig::for_provider(&self.embeddings.provider().info());
        let chunks = chunk_text(&document.text, &chunk_config);
        if chunks.is_empty() {
            return Err(Error::InvalidArgument("document text must not be empty".into()));
        }

        self.ensure_collection_ready(collection).await?;

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = self.embeddings.embed_batch(&texts).await?;

        let indexed_at = Utc::now().to_rfc3339();
        let points: Vec<StoredPoint> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| StoredPoint {
                id: point_id(&document.source, chunk.index, &chunk.text),
                vector,
                payload: DocumentPayload {
                    text: chunk.text.clone(),
                    source: document.source.clone(),
                    title: document.title.clone(),
                    chunk_index: chunk.index as u64,
                    indexed_at: indexed_at.clone(),
                },
            })
            .collect();

        self.store.upsert(collection, &points).await?;

        info!(
            collection,
            source = %document.source,
            chunks = points.len(),
            "indexed document"
        );

        Ok(IndexReport {
            collection: collection.to_string(),
            source: document.source.clone(),
            chunks: points.len(),
            point_ids: points.into_iter().map(|p| p.id).collect(),
        })
    }

    /// Nearest stored chunks to `query`, best first.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty query or zero limit, then any
    /// provisioning, embedding or store failure.
    pub async fn search(&self, collection: &str, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(Error::InvalidArgument("search query must not be empty".into()));
        }
        if limit == 0 {
            return Err(Error::InvalidArgument("search limit must be positive".into()));
        }

        self.ensure_collection_ready(collection).await?;
        let vector = self.embeddings.embed(query).await?;
        let hits = self.store.search(collection, &vector, limit).await?;

        debug!(collection, hits = hits.len(), "search complete");
        Ok(hits)
    }

    /// Names of all collections on the store.
    ///
    /// # Errors
    ///
    /// The classified store failure.
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        Ok(self.store.list_collections().await?)
    }
}

/// Deterministic point id: the first 16 bytes of
/// `sha256(source \0 index \0 text)` as a UUID.
#[must_use]
pub fn point_id(source: &str, index: usize, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([0]);
    hasher.update(index.to_le_bytes());
    hasher.update([0]);
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::from_bytes(bytes).to_string()
}
