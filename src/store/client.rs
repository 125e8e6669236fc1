//! Vector store trait.
//!
//! Defines the typed RPC surface the orchestrator uses. Uses async methods
//! so remote backends can suspend on I/O.

use std::future::Future;

use super::classify::StoreResult;
use super::types::{CollectionSchema, SearchHit, StoredPoint};

/// A remote vector store with named collections.
///
/// Implementations hold only immutable connection state, so one instance
/// can serve concurrent requests. All failures are already classified.
pub trait VectorStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Names of all existing collections.
    fn list_collections(&self) -> impl Future<Output = StoreResult<Vec<String>>> + Send;

    /// Create a collection with the full schema.
    ///
    /// Fails with [`StoreFailure::AlreadyExists`](super::StoreFailure::AlreadyExists)
    /// if the name is taken.
    fn create_collection(&self, schema: &CollectionSchema) -> impl Future<Output = StoreResult<()>> + Send;

    /// Insert or overwrite points by id.
    fn upsert(&self, collection: &str, points: &[StoredPoint]) -> impl Future<Output = StoreResult<()>> + Send;

    /// The `limit` nearest points to `vector`, best first.
    fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> impl Future<Output = StoreResult<Vec<SearchHit>>> + Send;
}
