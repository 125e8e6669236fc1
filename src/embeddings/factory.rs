//! Embedding provider factory.
//!
//! Builds the configured provider and probes which providers are usable.

use crate::error::Result;

use super::huggingface::HuggingFaceProvider;
use super::ollama::OllamaProvider;
use super::provider::{BoxedProvider, EmbeddingProvider};
use super::types::{EmbeddingProviderConfig, EmbeddingProviderType};

/// Available provider detection result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProviderDetection {
    /// List of available provider names.
    pub available: Vec<String>,
    /// Recommended provider (first available).
    pub recommended: Option<String>,
}

/// Detect which HTTP embedding providers are reachable with this configuration.
///
/// Model2Vec is not probed: checking it means downloading the model.
pub async fn detect_available_providers(config: &EmbeddingProviderConfig) -> ProviderDetection {
    let mut available = Vec::new();

    let ollama_endpoint = match config.provider {
        EmbeddingProviderType::Ollama => config.endpoint.clone(),
        _ => None,
    };
    let ollama_model = match config.provider {
        EmbeddingProviderType::Ollama => Some(config.model.clone()),
        _ => None,
    };
    if OllamaProvider::with_config(ollama_endpoint, ollama_model).is_available().await {
        available.push("ollama".to_string());
    }

    if let Some(hf) = HuggingFaceProvider::with_config(None, None, config.token.clone()) {
        if hf.is_available().await {
            available.push("huggingface".to_string());
        }
    }

    let recommended = available.first().cloned();

    ProviderDetection {
        available,
        recommended,
    }
}

/// Create the configured embedding provider.
///
/// No availability probe is made; a dead provider fails on first use.
///
/// # Errors
///
/// Returns `Error::Config` if a required credential is missing, or
/// `Error::Embedding` if a local model cannot be loaded.
pub fn create_embedding_provider(config: &EmbeddingProviderConfig) -> Result<BoxedProvider> {
    config.validate()?;

    let provider = match config.provider {
        EmbeddingProviderType::Ollama => BoxedProvider::new(OllamaProvider::from_config(config)),
        EmbeddingProviderType::Huggingface => {
            BoxedProvider::new(HuggingFaceProvider::from_config(config)?)
        }
        EmbeddingProviderType::Model2vec => {
            BoxedProvider::new(super::model2vec::Model2VecProvider::from_config(config)?)
        }
    };

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_create_ollama() {
        let provider = create_embedding_provider(&EmbeddingProviderConfig::default()).unwrap();
        let info = provider.info();
        assert_eq!(info.name, "ollama");
        assert_eq!(info.dimensions, 768);
    }

    #[test]
    fn test_create_huggingface_without_token_fails() {
        let config = EmbeddingProviderConfig::for_provider(EmbeddingProviderType::Huggingface);
        let err = create_embedding_provider(&config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InternalError);
    }

    #[test]
    fn test_create_huggingface_with_token() {
        let mut config = EmbeddingProviderConfig::for_provider(EmbeddingProviderType::Huggingface);
        config.token = Some("hf_test".into());
        let provider = create_embedding_provider(&config).unwrap();
        assert_eq!(provider.info().name, "huggingface");
        assert_eq!(provider.info().dimensions, 384);
    }

    #[test]
    fn test_invalid_config_rejected_before_construction() {
        let mut config = EmbeddingProviderConfig::default();
        config.dimensions = 0;
        assert!(create_embedding_provider(&config).is_err());
    }
}
