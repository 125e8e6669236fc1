//! In-memory fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use ragdocs::embeddings::{EmbeddingGateway, EmbeddingProvider, EmbeddingProviderConfig, ProviderInfo};
use ragdocs::error::{Error, Result};
use ragdocs::store::{
    classify_failure, CollectionSchema, CollectionSettings, SearchHit, StoreFailure, StoreResult,
    StoredPoint, VectorStore,
};
use ragdocs::RetrievalOrchestrator;

#[derive(Default)]
struct StoreState {
    collections: BTreeMap<String, CollectionSchema>,
    points: BTreeMap<String, BTreeMap<String, StoredPoint>>,
    create_calls: Vec<CollectionSchema>,
    list_calls: usize,
    list_errors: VecDeque<String>,
    create_errors: VecDeque<String>,
}

/// A vector store kept in memory.
///
/// Records every create call, can fail the next list/create with a given
/// transport text, and yields between list and create so concurrent
/// callers interleave.
#[derive(Default)]
pub struct FakeStore {
    state: Mutex<StoreState>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(name: &str, settings: &CollectionSettings) -> Self {
        let store = Self::new();
        store
            .state
            .lock()
            .unwrap()
            .collections
            .insert(name.to_string(), settings.schema(name));
        store
    }

    /// Fail the next list call with this transport text.
    pub fn fail_next_list(&self, text: &str) {
        self.state.lock().unwrap().list_errors.push_back(text.to_string());
    }

    /// Fail the next create call with this transport text.
    pub fn fail_next_create(&self, text: &str) {
        self.state.lock().unwrap().create_errors.push_back(text.to_string());
    }

    pub fn create_calls(&self) -> Vec<CollectionSchema> {
        self.state.lock().unwrap().create_calls.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.state.lock().unwrap().collections.keys().cloned().collect()
    }

    pub fn points(&self, collection: &str) -> Vec<StoredPoint> {
        self.state
            .lock()
            .unwrap()
            .points
            .get(collection)
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl VectorStore for FakeStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        let names = {
            let mut state = self.state.lock().unwrap();
            state.list_calls += 1;
            if let Some(text) = state.list_errors.pop_front() {
                return Err(classify_failure(&text));
            }
            state.collections.keys().cloned().collect()
        };
        // Let a concurrent caller run its list before we create
        tokio::task::yield_now().await;
        Ok(names)
    }

    async fn create_collection(&self, schema: &CollectionSchema) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.create_calls.push(schema.clone());

        if let Some(text) = state.create_errors.pop_front() {
            return Err(classify_failure(&text));
        }
        if state.collections.contains_key(&schema.name) {
            return Err(StoreFailure::AlreadyExists(format!(
                "Wrong input: Collection `{}` already exists!",
                schema.name
            )));
        }
        state.collections.insert(schema.name.clone(), schema.clone());
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: &[StoredPoint]) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        if !state.collections.contains_key(collection) {
            return Err(StoreFailure::Unknown(format!("Not found: Collection `{collection}` doesn't exist!")));
        }
        let stored = state.points.entry(collection.to_string()).or_default();
        for point in points {
            stored.insert(point.id.clone(), point.clone());
        }
        Ok(())
    }

    async fn search(&self, collection: &str, vector: &[f32], limit: usize) -> StoreResult<Vec<SearchHit>> {
        let state = self.state.lock().unwrap();
        let Some(points) = state.points.get(collection) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<SearchHit> = points
            .values()
            .map(|p| SearchHit {
                id: p.id.clone(),
                score: p.vector.iter().zip(vector).map(|(a, b)| a * b).sum(),
                text: p.payload.text.clone(),
                source: p.payload.source.clone(),
                title: p.payload.title.clone(),
                chunk_index: Some(p.payload.chunk_index),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        Ok(hits)
    }
}

/// A provider that returns vectors of a fixed length, derived from the text.
pub struct FakeProvider {
    pub len: usize,
    pub fail: Option<String>,
}

impl FakeProvider {
    pub fn new(len: usize) -> Self {
        Self { len, fail: None }
    }

    pub fn failing(message: &str) -> Self {
        Self { len: 768, fail: Some(message.to_string()) }
    }
}

impl EmbeddingProvider for FakeProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "fake".into(),
            model: "fake-model".into(),
            dimensions: self.len,
            max_chars: 2000,
            available: true,
        }
    }

    async fn is_available(&self) -> bool {
        self.fail.is_none()
    }

    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(message) = &self.fail {
            return Err(Error::Other(message.clone()));
        }
        let seed = text.bytes().map(f32::from).sum::<f32>();
        Ok((0..self.len).map(|i| ((seed + i as f32) % 7.0) / 7.0).collect())
    }
}

/// Default embedding config (ollama, nomic-embed-text, 768).
pub fn embedding_config(dimensions: usize) -> EmbeddingProviderConfig {
    let mut config = EmbeddingProviderConfig::default();
    config.dimensions = dimensions;
    config
}

/// An orchestrator over the fakes with matching 768-dimension settings.
pub fn orchestrator(store: FakeStore) -> RetrievalOrchestrator<FakeProvider, FakeStore> {
    orchestrator_with(FakeProvider::new(768), store)
}

pub fn orchestrator_with(
    provider: FakeProvider,
    store: FakeStore,
) -> RetrievalOrchestrator<FakeProvider, FakeStore> {
    let gateway = EmbeddingGateway::new(provider, embedding_config(768)).unwrap();
    RetrievalOrchestrator::new(gateway, store, CollectionSettings::default()).unwrap()
}
