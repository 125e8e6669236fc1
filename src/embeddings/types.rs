//! Embedding types and provider configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedding provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderType {
    #[default]
    Ollama,
    Huggingface,
    /// Model2Vec - local static embeddings, no server needed
    Model2vec,
}

impl std::fmt::Display for EmbeddingProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::Huggingface => write!(f, "huggingface"),
            Self::Model2vec => write!(f, "model2vec"),
        }
    }
}

impl std::str::FromStr for EmbeddingProviderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "huggingface" | "hf" => Ok(Self::Huggingface),
            "model2vec" => Ok(Self::Model2vec),
            _ => Err(format!("Unknown embedding provider: {s}")),
        }
    }
}

impl EmbeddingProviderType {
    /// Model used when none is configured.
    #[must_use]
    pub fn default_model(&self) -> ModelConfig {
        match self {
            Self::Ollama => ollama_models::default_config(),
            Self::Huggingface => huggingface_models::default_config(),
            Self::Model2vec => model2vec_models::default_config(),
        }
    }

    /// Known (or assumed) configuration for a model of this provider.
    #[must_use]
    pub fn model_config(&self, model: &str) -> ModelConfig {
        match self {
            Self::Ollama => ollama_models::get_config(model),
            Self::Huggingface => huggingface_models::get_config(model),
            Self::Model2vec => model2vec_models::get_config(model),
        }
    }
}

/// Immutable embedding provider configuration.
///
/// Fixed once the gateway is built; lives as long as the orchestrator.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddingProviderConfig {
    pub provider: EmbeddingProviderType,
    pub model: String,
    /// Output length every vector must have.
    pub dimensions: usize,
    /// Provider endpoint; `None` uses the provider's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// API token (HuggingFace).
    #[serde(skip)]
    pub token: Option<String>,
}

impl EmbeddingProviderConfig {
    /// Config for a provider's default model.
    #[must_use]
    pub fn for_provider(provider: EmbeddingProviderType) -> Self {
        let model = provider.default_model();
        Self {
            provider,
            model: model.name,
            dimensions: model.dimensions,
            endpoint: None,
            token: None,
        }
    }

    /// Config for a specific model; dimensions come from the known-model table.
    #[must_use]
    pub fn for_model(provider: EmbeddingProviderType, model: impl Into<String>) -> Self {
        let model = model.into();
        let dimensions = provider.model_config(&model).dimensions;
        Self {
            provider,
            model,
            dimensions,
            endpoint: None,
            token: None,
        }
    }

    /// # Errors
    ///
    /// Returns `Error::Config` for an empty model name or zero dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::Config("embedding model must not be empty".into()));
        }
        if self.dimensions == 0 {
            return Err(Error::Config("embedding dimensions must be positive".into()));
        }
        Ok(())
    }
}

impl Default for EmbeddingProviderConfig {
    fn default() -> Self {
        Self::for_provider(EmbeddingProviderType::Ollama)
    }
}

impl std::fmt::Debug for EmbeddingProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Provider metadata returned from availability check.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
    pub dimensions: usize,
    pub max_chars: usize,
    pub available: bool,
}

/// Model configuration with dimensions and max chars.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub name: String,
    pub dimensions: usize,
    pub max_chars: usize,
}

/// Ollama model configurations.
pub mod ollama_models {
    use super::ModelConfig;

    pub fn nomic_embed_text() -> ModelConfig {
        ModelConfig {
            name: "nomic-embed-text".to_string(),
            dimensions: 768,
            max_chars: 5000,
        }
    }

    pub fn mxbai_embed_large() -> ModelConfig {
        ModelConfig {
            name: "mxbai-embed-large".to_string(),
            dimensions: 1024,
            max_chars: 1500,
        }
    }

    pub fn all_minilm() -> ModelConfig {
        ModelConfig {
            name: "all-minilm".to_string(),
            dimensions: 384,
            max_chars: 800,
        }
    }

    pub fn default_config() -> ModelConfig {
        nomic_embed_text()
    }

    pub fn get_config(model: &str) -> ModelConfig {
        // Ollama accepts "name:tag"; the tag does not change the output size.
        let base = model.split(':').next().unwrap_or(model);
        match base {
            "nomic-embed-text" => nomic_embed_text(),
            "mxbai-embed-large" => mxbai_embed_large(),
            "all-minilm" => all_minilm(),
            _ => ModelConfig {
                name: model.to_string(),
                dimensions: 768, // Default assumption
                max_chars: 5000,
            },
        }
    }
}

/// HuggingFace model configurations.
pub mod huggingface_models {
    use super::ModelConfig;

    pub fn all_minilm_l6_v2() -> ModelConfig {
        ModelConfig {
            name: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
            max_chars: 800,
        }
    }

    pub fn all_mpnet_base_v2() -> ModelConfig {
        ModelConfig {
            name: "sentence-transformers/all-mpnet-base-v2".to_string(),
            dimensions: 768,
            max_chars: 1500,
        }
    }

    pub fn default_config() -> ModelConfig {
        all_minilm_l6_v2()
    }

    pub fn get_config(model: &str) -> ModelConfig {
        match model {
            "sentence-transformers/all-MiniLM-L6-v2" => all_minilm_l6_v2(),
            "sentence-transformers/all-mpnet-base-v2" => all_mpnet_base_v2(),
            _ => ModelConfig {
                name: model.to_string(),
                dimensions: 384, // Default assumption
                max_chars: 800,
            },
        }
    }
}

/// Model2Vec model configurations (static embeddings).
pub mod model2vec_models {
    use super::ModelConfig;

    /// potion-base-8M - fast 256d embeddings
    pub fn potion_base_8m() -> ModelConfig {
        ModelConfig {
            name: "minishlab/potion-base-8M".to_string(),
            dimensions: 256,
            max_chars: 2048,
        }
    }

    /// potion-base-32M - larger 256d embeddings
    pub fn potion_base_32m() -> ModelConfig {
        ModelConfig {
            name: "minishlab/potion-base-32M".to_string(),
            dimensions: 256,
            max_chars: 2048,
        }
    }

    pub fn default_config() -> ModelConfig {
        potion_base_8m()
    }

    pub fn get_config(model: &str) -> ModelConfig {
        match model {
            "minishlab/potion-base-8M" | "potion-base-8M" => potion_base_8m(),
            "minishlab/potion-base-32M" | "potion-base-32M" => potion_base_32m(),
            _ => ModelConfig {
                name: model.to_string(),
                dimensions: 256, // Model2Vec default
                max_chars: 2048,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_nomic_768() {
        let config = EmbeddingProviderConfig::default();
        assert_eq!(config.provider, EmbeddingProviderType::Ollama);
        assert_eq!(config.model, "nomic-embed-text");
        assert_eq!(config.dimensions, 768);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_model_uses_table() {
        let config = EmbeddingProviderConfig::for_model(EmbeddingProviderType::Ollama, "mxbai-embed-large:latest");
        assert_eq!(config.dimensions, 1024);

        let config = EmbeddingProviderConfig::for_model(
            EmbeddingProviderType::Huggingface,
            "sentence-transformers/all-mpnet-base-v2",
        );
        assert_eq!(config.dimensions, 768);
    }

    #[test]
    fn test_validate() {
        let mut config = EmbeddingProviderConfig::default();
        config.dimensions = 0;
        assert!(config.validate().is_err());

        let mut config = EmbeddingProviderConfig::default();
        config.model = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = EmbeddingProviderConfig::for_provider(EmbeddingProviderType::Huggingface);
        config.token = Some("hf_secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("hf_secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("HF".parse::<EmbeddingProviderType>(), Ok(EmbeddingProviderType::Huggingface));
        assert_eq!("model2vec".parse::<EmbeddingProviderType>(), Ok(EmbeddingProviderType::Model2vec));
        assert!("openai".parse::<EmbeddingProviderType>().is_err());
    }
}
