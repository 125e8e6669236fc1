//! Embedding gateway.
//!
//! Wraps the configured provider behind one contract: a successful `embed`
//! returns exactly `dimensions` floats, and every failure is an
//! `Error::Embedding` naming the provider and model. No retries here.

use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::provider::EmbeddingProvider;
use super::types::EmbeddingProviderConfig;

/// Shape-checked access to one embedding provider.
pub struct EmbeddingGateway<P> {
    provider: P,
    config: EmbeddingProviderConfig,
}

impl<P: EmbeddingProvider> EmbeddingGateway<P> {
    /// # Errors
    ///
    /// Returns `Error::Config` if `config` is invalid.
    pub fn new(provider: P, config: EmbeddingProviderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    #[must_use]
    pub fn config(&self) -> &EmbeddingProviderConfig {
        &self.config
    }

    /// Length of every vector this gateway returns.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Embed one text. Empty input is passed to the provider unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::Embedding` if the provider fails or returns a vector
    /// of the wrong length.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let vector = self
            .provider
            .generate_embedding(text)
            .await
            .map_err(|e| self.wrap(e))?;

        self.check_shape(&vector)?;
        debug!(provider = %self.config.provider, dim = vector.len(), chars = text.len(), "embedded text");
        Ok(vector)
    }

    /// Embed several texts in one provider call.
    ///
    /// # Errors
    ///
    /// Returns `Error::Embedding` if the provider fails, returns a different
    /// number of vectors than inputs, or any vector has the wrong length.
    pub async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self
            .provider
            .generate_embeddings(texts)
            .await
            .map_err(|e| self.wrap(e))?;

        if vectors.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "{}: returned {} vectors for {} inputs",
                self.label(),
                vectors.len(),
                texts.len()
            )));
        }

        for vector in &vectors {
            self.check_shape(vector)?;
        }
        Ok(vectors)
    }

    fn label(&self) -> String {
        format!("{} ({})", self.config.provider, self.config.model)
    }

    fn wrap(&self, cause: Error) -> Error {
        let cause = match cause {
            Error::Embedding(message) => message,
            other => other.to_string(),
        };
        Error::Embedding(format!("{}: {cause}", self.label()))
    }

    // Never truncate or pad: a wrong length means the model and the configured
    // dimensions disagree.
    fn check_shape(&self, vector: &[f32]) -> Result<()> {
        if vector.len() == self.config.dimensions {
            return Ok(());
        }

        warn!(
            expected = self.config.dimensions,
            actual = vector.len(),
            model = %self.config.model,
            "embedding dimension mismatch"
        );
        Err(Error::Embedding(format!(
            "{}: returned a {}-dimension vector, expected {} dimensions (check the model and EMBEDDING_DIMENSIONS)",
            self.label(),
            vector.len(),
            self.config.dimensions
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::ProviderInfo;
    use crate::error::ErrorKind;

    /// Returns `len` floats, or fails with the given error text.
    struct Scripted {
        len: usize,
        fail: Option<&'static str>,
    }

    impl EmbeddingProvider for Scripted {
        fn info(&self) -> ProviderInfo {
            ProviderInfo {
                name: "scripted".into(),
                model: "test".into(),
                dimensions: self.len,
                max_chars: 100,
                available: true,
            }
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
            match self.fail {
                Some(msg) => Err(Error::Other(msg.to_string())),
                None => Ok(vec![text.len() as f32; self.len]),
            }
        }
    }

    fn config(dimensions: usize) -> EmbeddingProviderConfig {
        let mut config = EmbeddingProviderConfig::default();
        config.dimensions = dimensions;
        config
    }

    #[tokio::test]
    async fn test_embed_returns_configured_length() {
        let gateway = EmbeddingGateway::new(Scripted { len: 8, fail: None }, config(8)).unwrap();
        let vector = gateway.embed("hello").await.unwrap();
        assert_eq!(vector.len(), 8);

        // Empty input goes to the provider untouched.
        let vector = gateway.embed("").await.unwrap();
        assert_eq!(vector, vec![0.0; 8]);
    }

    #[tokio::test]
    async fn test_wrong_length_is_embedding_failure() {
        let gateway = EmbeddingGateway::new(Scripted { len: 384, fail: None }, config(768)).unwrap();
        let err = gateway.embed("hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmbeddingFailure);
        assert!(err.to_string().contains("384"));
        assert!(err.to_string().contains("768"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_wrapped() {
        let gateway = EmbeddingGateway::new(
            Scripted { len: 8, fail: Some("model not found") },
            config(8),
        )
        .unwrap();
        let err = gateway.embed("hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmbeddingFailure);
        assert_eq!(
            err.to_string(),
            "Failed to generate embeddings: ollama (nomic-embed-text): model not found"
        );
    }

    #[tokio::test]
    async fn test_batch_checks_every_vector() {
        let gateway = EmbeddingGateway::new(Scripted { len: 4, fail: None }, config(4)).unwrap();
        let vectors = gateway.embed_batch(&["a", "bb"]).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1], vec![2.0; 4]);

        let gateway = EmbeddingGateway::new(Scripted { len: 3, fail: None }, config(4)).unwrap();
        assert!(gateway.embed_batch(&["a"]).await.is_err());
        assert!(gateway.embed_batch(&[]).await.unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(EmbeddingGateway::new(Scripted { len: 0, fail: None }, config(0)).is_err());
    }
}
