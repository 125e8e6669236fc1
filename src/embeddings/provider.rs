//! Embedding provider trait.
//!
//! Defines the interface that all embedding providers must implement.
//! Uses async methods for HTTP-based providers.

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use super::types::ProviderInfo;

/// Trait for embedding providers.
///
/// Implemented by Ollama, HuggingFace and Model2Vec providers, and by
/// [`BoxedProvider`] for runtime selection.
pub trait EmbeddingProvider: Send + Sync {
    /// Get provider metadata.
    fn info(&self) -> ProviderInfo;

    /// Check if the provider is available.
    ///
    /// For Ollama, this checks if the server is running and the model is pulled.
    /// For HuggingFace, this checks that an API token is present.
    fn is_available(&self) -> impl Future<Output = bool> + Send;

    /// Generate embedding for a single text.
    fn generate_embedding(&self, text: &str) -> impl Future<Output = Result<Vec<f32>>> + Send;

    /// Generate embeddings for multiple texts (batch).
    ///
    /// Default implementation calls `generate_embedding` for each text.
    fn generate_embeddings(&self, texts: &[&str]) -> impl Future<Output = Result<Vec<Vec<f32>>>> + Send {
        async move {
            let mut results = Vec::with_capacity(texts.len());
            for text in texts {
                results.push(self.generate_embedding(text).await?);
            }
            Ok(results)
        }
    }
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Boxed provider for dynamic dispatch.
///
/// The trait returns `impl Future`, so it is not object safe; this wrapper
/// erases the concrete provider chosen from configuration.
pub struct BoxedProvider {
    inner: Box<dyn EmbeddingProviderBoxed>,
}

/// Object-safe version of [`EmbeddingProvider`] for boxing.
trait EmbeddingProviderBoxed: Send + Sync {
    fn info(&self) -> ProviderInfo;
    fn is_available_boxed(&self) -> BoxFuture<'_, bool>;
    fn generate_embedding_boxed(&self, text: String) -> BoxFuture<'_, Result<Vec<f32>>>;
    fn generate_embeddings_boxed(&self, texts: Vec<String>) -> BoxFuture<'_, Result<Vec<Vec<f32>>>>;
}

impl BoxedProvider {
    /// Create a new boxed provider.
    pub fn new<P: EmbeddingProvider + 'static>(provider: P) -> Self {
        Self {
            inner: Box::new(BoxedProviderWrapper(provider)),
        }
    }
}

impl EmbeddingProvider for BoxedProvider {
    fn info(&self) -> ProviderInfo {
        self.inner.info()
    }

    async fn is_available(&self) -> bool {
        self.inner.is_available_boxed().await
    }

    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        self.inner.generate_embedding_boxed(text.to_string()).await
    }

    async fn generate_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let owned = texts.iter().map(|s| (*s).to_string()).collect();
        self.inner.generate_embeddings_boxed(owned).await
    }
}

/// Wrapper to implement `EmbeddingProviderBoxed` for any `EmbeddingProvider`.
struct BoxedProviderWrapper<P: EmbeddingProvider + 'static>(P);

impl<P: EmbeddingProvider + 'static> EmbeddingProviderBoxed for BoxedProviderWrapper<P> {
    fn info(&self) -> ProviderInfo {
        self.0.info()
    }

    fn is_available_boxed(&self) -> BoxFuture<'_, bool> {
        Box::pin(self.0.is_available())
    }

    // Owned inputs keep the returned future independent of the caller's borrows.
    fn generate_embedding_boxed(&self, text: String) -> BoxFuture<'_, Result<Vec<f32>>> {
        Box::pin(async move { self.0.generate_embedding(&text).await })
    }

    fn generate_embeddings_boxed(&self, texts: Vec<String>) -> BoxFuture<'_, Result<Vec<Vec<f32>>>> {
        Box::pin(async move {
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            self.0.generate_embeddings(&refs).await
        })
    }
}
