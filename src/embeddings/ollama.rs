//! Ollama embedding provider.
//!
//! Uses a local Ollama server for embedding generation.
//! This is the default provider (`nomic-embed-text`, 768 dimensions).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

use super::provider::EmbeddingProvider;
use super::types::{ollama_models, EmbeddingProviderConfig, ProviderInfo};

/// Default Ollama server URL.
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

/// Ollama embedding provider.
pub struct OllamaProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dimensions: usize,
    max_chars: usize,
}

impl OllamaProvider {
    /// Create a provider for the default endpoint and model.
    pub fn new() -> Self {
        Self::with_config(None, None)
    }

    /// Create a provider with a custom endpoint and/or model.
    ///
    /// Dimensions come from the known-model table.
    pub fn with_config(endpoint: Option<String>, model: Option<String>) -> Self {
        let model = model.unwrap_or_else(|| ollama_models::default_config().name);
        let config = ollama_models::get_config(&model);

        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_OLLAMA_ENDPOINT.to_string()),
            model,
            dimensions: config.dimensions,
            max_chars: config.max_chars,
        }
    }

    /// Create a provider from resolved configuration.
    ///
    /// Configured dimensions override the table.
    pub fn from_config(config: &EmbeddingProviderConfig) -> Self {
        let mut provider = Self::with_config(config.endpoint.clone(), Some(config.model.clone()));
        provider.dimensions = config.dimensions;
        provider
    }

    async fn embed(&self, input: EmbedInput<'_>) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.endpoint.trim_end_matches('/'));

        let request = OllamaEmbedRequest {
            model: &self.model,
            input,
        };

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!("Ollama embedding failed ({status}): {error}")));
        }

        let data: OllamaEmbedResponse = response.json().await
            .map_err(|e| Error::Embedding(format!("Failed to parse Ollama response: {e}")))?;

        Ok(data.embeddings)
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Ollama API response for listing models.
#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    models: Option<Vec<OllamaModel>>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

/// Ollama API request for embedding.
#[derive(Debug, Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: EmbedInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum EmbedInput<'a> {
    Single(&'a str),
    Batch(Vec<&'a str>),
}

/// Ollama API response for embedding.
#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl EmbeddingProvider for OllamaProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "ollama".to_string(),
            model: self.model.clone(),
            dimensions: self.dimensions,
            max_chars: self.max_chars,
            available: false, // Will be checked by is_available()
        }
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.endpoint.trim_end_matches('/'));

        let response = match self.client
            .get(&url)
            .timeout(std::time::Duration::from_secs(2))
            .send()
            .await
        {
            Ok(r) => r,
            Err(_) => return false,
        };

        if !response.status().is_success() {
            return false;
        }

        let data: OllamaTagsResponse = match response.json().await {
            Ok(d) => d,
            Err(_) => return false,
        };

        // Pulled models are listed as "name:tag"
        data.models.is_some_and(|models| {
            models.iter().any(|m| {
                m.name == self.model || m.name.starts_with(&format!("{}:", self.model))
            })
        })
    }

    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(EmbedInput::Single(text))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("No embeddings returned from Ollama".into()))
    }

    async fn generate_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.embed(EmbedInput::Batch(texts.to_vec())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new();
        let info = provider.info();
        assert_eq!(info.name, "ollama");
        assert_eq!(info.model, "nomic-embed-text");
        assert_eq!(info.dimensions, 768);
        assert_eq!(provider.endpoint, DEFAULT_OLLAMA_ENDPOINT);
    }

    #[test]
    fn test_ollama_provider_custom_config() {
        let provider = OllamaProvider::with_config(
            Some("http://custom:11434".to_string()),
            Some("mxbai-embed-large".to_string()),
        );
        let info = provider.info();
        assert_eq!(info.model, "mxbai-embed-large");
        assert_eq!(info.dimensions, 1024);
    }

    #[test]
    fn test_configured_dimensions_win() {
        let mut config = EmbeddingProviderConfig::default();
        config.model = "my-finetune".into();
        config.dimensions = 512;
        let provider = OllamaProvider::from_config(&config);
        assert_eq!(provider.info().dimensions, 512);
    }

    #[test]
    fn test_request_shape() {
        let request = OllamaEmbedRequest {
            model: "nomic-embed-text",
            input: EmbedInput::Batch(vec!["a", "b"]),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "nomic-embed-text");
        assert_eq!(json["input"][1], "b");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_embedding_error() {
        let provider = OllamaProvider::with_config(Some("http://127.0.0.1:9".to_string()), None);
        assert!(!provider.is_available().await);

        let err = provider.generate_embedding("hello").await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::EmbeddingFailure);
    }
}
