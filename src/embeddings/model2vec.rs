//! Model2Vec embedding provider.
//!
//! Local static embeddings: pre-computed token vectors averaged per input,
//! no inference server. Useful offline; vectors are 256-dimensional, so
//! collections built with it are not interchangeable with 768d models.

use crate::error::{Error, Result};
use model2vec_rs::model::StaticModel;
use std::sync::Arc;

use super::provider::EmbeddingProvider;
use super::types::{model2vec_models, EmbeddingProviderConfig, ProviderInfo};

/// Model2Vec embedding provider.
///
/// Loads the model into memory on creation.
pub struct Model2VecProvider {
    model: Arc<StaticModel>,
    model_name: String,
    dimensions: usize,
    max_chars: usize,
}

impl Model2VecProvider {
    /// Load a model from the HuggingFace Hub (or local cache).
    ///
    /// # Errors
    ///
    /// Returns `Error::Embedding` if the model cannot be loaded.
    pub fn with_model(model_name: Option<String>) -> Result<Self> {
        let model_name = model_name.unwrap_or_else(|| model2vec_models::default_config().name);
        let config = model2vec_models::get_config(&model_name);

        let model = StaticModel::from_pretrained(
            &model_name,
            None, // No HF token needed for public models
            None, // Use default normalization
            None, // No subfolder
        )
        .map_err(|e| Error::Embedding(format!("Failed to load Model2Vec model '{model_name}': {e}")))?;

        Ok(Self {
            model: Arc::new(model),
            model_name,
            dimensions: config.dimensions,
            max_chars: config.max_chars,
        })
    }

    /// Load the configured model.
    ///
    /// # Errors
    ///
    /// Returns `Error::Embedding` if the model cannot be loaded.
    pub fn from_config(config: &EmbeddingProviderConfig) -> Result<Self> {
        let mut provider = Self::with_model(Some(config.model.clone()))?;
        provider.dimensions = config.dimensions;
        Ok(provider)
    }
}

impl EmbeddingProvider for Model2VecProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "model2vec".to_string(),
            model: self.model_name.clone(),
            dimensions: self.dimensions,
            max_chars: self.max_chars,
            available: true, // If constructed, it's available
        }
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let sentences = vec![text.to_string()];
        self.model
            .encode(&sentences)
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("Model2Vec returned no embeddings".into()))
    }

    async fn generate_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let sentences: Vec<String> = texts.iter().map(|&s| s.to_string()).collect();
        Ok(self.model.encode(&sentences))
    }
}
