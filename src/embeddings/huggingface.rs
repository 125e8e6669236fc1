//! HuggingFace Inference API embedding provider.
//!
//! Uses HuggingFace's hosted inference API for embedding generation.
//! Requires a HuggingFace API token (HF_TOKEN).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

use super::provider::EmbeddingProvider;
use super::types::{huggingface_models, EmbeddingProviderConfig, ProviderInfo};

/// Default HuggingFace inference router.
pub const DEFAULT_HF_ENDPOINT: &str = "https://router.huggingface.co/hf-inference";

/// HuggingFace Inference API embedding provider.
pub struct HuggingFaceProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    token: String,
    dimensions: usize,
    max_chars: usize,
}

impl HuggingFaceProvider {
    /// Create a new HuggingFace provider.
    ///
    /// Returns `None` if no API token is given.
    pub fn with_config(
        endpoint: Option<String>,
        model: Option<String>,
        token: Option<String>,
    ) -> Option<Self> {
        let token = token.filter(|t| !t.is_empty())?;
        let model = model.unwrap_or_else(|| huggingface_models::default_config().name);
        let config = huggingface_models::get_config(&model);

        Some(Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_HF_ENDPOINT.to_string()),
            model,
            token,
            dimensions: config.dimensions,
            max_chars: config.max_chars,
        })
    }

    /// Create a provider from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no token is configured.
    pub fn from_config(config: &EmbeddingProviderConfig) -> Result<Self> {
        let mut provider = Self::with_config(
            config.endpoint.clone(),
            Some(config.model.clone()),
            config.token.clone(),
        )
        .ok_or_else(|| Error::Config("HuggingFace provider requires HF_TOKEN".into()))?;
        provider.dimensions = config.dimensions;
        Ok(provider)
    }

    async fn post(&self, inputs: HfInputs<'_>) -> Result<HfEmbedResponse> {
        let url = format!("{}/models/{}/pipeline/feature-extraction", self.endpoint, self.model);

        let request = HfEmbedRequest {
            inputs,
            options: HfOptions { wait_for_model: true },
        };

        let response = self.client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("HuggingFace request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "HuggingFace API error ({status}): {error}"
            )));
        }

        response.json().await
            .map_err(|e| Error::Embedding(format!("Failed to parse HuggingFace response: {e}")))
    }
}

/// HuggingFace API request for feature extraction.
#[derive(Debug, Serialize)]
struct HfEmbedRequest<'a> {
    inputs: HfInputs<'a>,
    options: HfOptions,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum HfInputs<'a> {
    Single(&'a str),
    Batch(Vec<&'a str>),
}

#[derive(Debug, Serialize)]
struct HfOptions {
    wait_for_model: bool,
}

/// HuggingFace API response - can be single or batch embeddings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HfEmbedResponse {
    /// Direct embedding (pooled models)
    Direct(Vec<f32>),
    /// Nested array for sentence-transformers
    Single(Vec<Vec<f32>>),
    /// Batch embeddings
    Batch(Vec<Vec<Vec<f32>>>),
}

impl EmbeddingProvider for HuggingFaceProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "huggingface".to_string(),
            model: self.model.clone(),
            dimensions: self.dimensions,
            max_chars: self.max_chars,
            available: false,
        }
    }

    async fn is_available(&self) -> bool {
        // Pinging the API would spend rate limit quota
        !self.token.is_empty()
    }

    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        match self.post(HfInputs::Single(text)).await? {
            HfEmbedResponse::Direct(embedding) => Ok(embedding),
            HfEmbedResponse::Single(nested) => nested.into_iter().next()
                .ok_or_else(|| Error::Embedding("No embeddings in response".into())),
            HfEmbedResponse::Batch(batch) => batch.into_iter()
                .next()
                .and_then(|nested| nested.into_iter().next())
                .ok_or_else(|| Error::Embedding("No embeddings in batch response".into())),
        }
    }

    async fn generate_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        match self.post(HfInputs::Batch(texts.to_vec())).await? {
            HfEmbedResponse::Batch(batch) => Ok(batch.into_iter()
                .filter_map(|nested| nested.into_iter().next())
                .collect()),
            HfEmbedResponse::Single(rows) => Ok(rows),
            HfEmbedResponse::Direct(embedding) => Ok(vec![embedding]),
        }
    }
}
