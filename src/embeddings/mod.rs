//! Embedding module.
//!
//! Turns text into fixed-length vectors for the vector store:
//! - **Ollama** (local) - default, `nomic-embed-text` (768d)
//! - **HuggingFace** (cloud) - requires API token
//! - **Model2Vec** (local, in-process) - static 256d embeddings
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   Orchestrator   │
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ EmbeddingGateway │  ← shape check, error wrapping
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │  BoxedProvider   │  ← chosen by factory from config
//! └────────┬─────────┘
//!     ┌────┼─────────┐
//!     ▼    ▼         ▼
//! Ollama  HuggingFace  Model2Vec
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use ragdocs::embeddings::{create_embedding_provider, EmbeddingGateway, EmbeddingProviderConfig};
//!
//! let config = EmbeddingProviderConfig::default();
//! let provider = create_embedding_provider(&config)?;
//! let gateway = EmbeddingGateway::new(provider, config)?;
//!
//! let embedding = gateway.embed("Hello world").await?;
//! assert_eq!(embedding.len(), 768);
//! ```

pub mod chunking;
pub mod factory;
pub mod gateway;
pub mod huggingface;
pub mod model2vec;
pub mod ollama;
pub mod provider;
pub mod types;

// Re-exports for convenience
pub use chunking::{chunk_text, ChunkConfig, TextChunk};
pub use factory::{create_embedding_provider, detect_available_providers, ProviderDetection};
pub use gateway::EmbeddingGateway;
pub use huggingface::{HuggingFaceProvider, DEFAULT_HF_ENDPOINT};
pub use model2vec::Model2VecProvider;
pub use ollama::{OllamaProvider, DEFAULT_OLLAMA_ENDPOINT};
pub use provider::{BoxedProvider, EmbeddingProvider};
pub use types::{
    huggingface_models, model2vec_models, ollama_models, EmbeddingProviderConfig,
    EmbeddingProviderType, ModelConfig, ProviderInfo,
};
