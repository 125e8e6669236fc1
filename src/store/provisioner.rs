//! Idempotent collection provisioning.
//!
//! List, then create only if absent. The two steps are not atomic on the
//! store, so a concurrent creator can win between them; the loser sees an
//! already-exists failure, which counts as success.

use tracing::{debug, info, warn};

use super::classify::{StoreFailure, StoreResult};
use super::client::VectorStore;
use super::types::CollectionSchema;

/// How a successful [`CollectionProvisioner::ensure`] call was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    /// The collection was listed; nothing was written.
    Existing,
    /// This call created the collection.
    Created,
    /// Another caller created it between our list and our create.
    CreatedConcurrently,
}

impl Provisioned {
    /// Whether the collection already existed before this call.
    #[must_use]
    pub const fn was_present(&self) -> bool {
        matches!(self, Self::Existing)
    }
}

/// Ensures named collections exist on a [`VectorStore`].
pub struct CollectionProvisioner<'a, S> {
    store: &'a S,
}

impl<'a, S: VectorStore> CollectionProvisioner<'a, S> {
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Make sure `schema.name` exists, creating it with `schema` if absent.
    ///
    /// An existing collection is trusted as-is; its schema is not compared.
    ///
    /// # Errors
    ///
    /// Returns the classified failure from listing or creating, except
    /// `AlreadyExists` from the create call.
    pub async fn ensure(&self, schema: &CollectionSchema) -> StoreResult<Provisioned> {
        let existing = self.store.list_collections().await?;

        if existing.iter().any(|name| name == &schema.name) {
            debug!(collection = %schema.name, backend = self.store.backend(), "collection already exists");
            return Ok(Provisioned::Existing);
        }

        match self.store.create_collection(schema).await {
            Ok(()) => {
                info!(
                    collection = %schema.name,
                    vector_size = schema.vector_size,
                    distance = %schema.distance,
                    replication_factor = schema.replication_factor,
                    "created collection"
                );
                Ok(Provisioned::Created)
            }
            Err(StoreFailure::AlreadyExists(message)) => {
                warn!(collection = %schema.name, %message, "collection created concurrently");
                Ok(Provisioned::CreatedConcurrently)
            }
            Err(e) => Err(e),
        }
    }
}
