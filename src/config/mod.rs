//! Configuration management.
//!
//! Resolves one immutable [`AppConfig`] at startup. Priority, highest first:
//! 1. Explicit overrides (CLI flags)
//! 2. Environment variables
//! 3. Config file (`~/.ragdocs/config.json`)
//! 4. Built-in defaults
//!
//! Environment variables:
//! - `QDRANT_URL` - Qdrant gRPC endpoint (default: `http://127.0.0.1:6334`)
//! - `QDRANT_API_KEY` - Qdrant API key (required for store commands)
//! - `QDRANT_TIMEOUT_SECS` - per-request timeout (default: 10)
//! - `EMBEDDING_PROVIDER` - `ollama` (default), `huggingface`, `model2vec`
//! - `EMBEDDING_MODEL` - model name for any provider
//! - `EMBEDDING_DIMENSIONS` - expected vector length (default: from model table)
//! - `OLLAMA_ENDPOINT`, `OLLAMA_MODEL` - Ollama overrides
//! - `HF_TOKEN`, `HF_MODEL`, `HF_ENDPOINT` - HuggingFace overrides
//! - `RAGDOCS_COLLECTION` - default collection (default: `documentation`)

mod file;

pub use file::{
    default_config_path, load_config, save_config, CollectionFileSettings, EmbeddingSettings,
    QdrantSettings, RagDocsConfig,
};

use std::path::Path;

use serde::Serialize;

use crate::embeddings::{EmbeddingProviderConfig, EmbeddingProviderType};
use crate::error::{Error, Result};
use crate::store::{CollectionSettings, OptimizerHints};

/// Default Qdrant endpoint (gRPC port).
pub const DEFAULT_QDRANT_URL: &str = "http://127.0.0.1:6334";

/// Default per-request timeout for Qdrant calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default collection name.
pub const DEFAULT_COLLECTION: &str = "documentation";

/// Vector store endpoint and credential.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionConfig {
    pub url: String,
    #[serde(skip)]
    pub api_key: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Values given explicitly by the caller; they beat every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub qdrant_url: Option<String>,
    pub qdrant_api_key: Option<String>,
    pub collection: Option<String>,
}

/// Fully resolved, immutable process configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub connection: ConnectionConfig,
    pub embeddings: EmbeddingProviderConfig,
    pub collection: CollectionSettings,
    pub default_collection: String,
}

impl AppConfig {
    /// Load the config file (or the default one) and resolve against the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for unreadable files, missing credentials or
    /// invalid values, and `Error::DimensionMismatch` if the collection
    /// vector size disagrees with the embedding dimensions.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let file = read_file(config_path)?;
        Self::resolve(&file, overrides, |key| std::env::var(key).ok())
    }

    /// Resolve only the embedding provider settings. Needs no Qdrant
    /// credential, so it serves commands that never touch the store.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for unreadable files or invalid values.
    pub fn load_embeddings(config_path: Option<&Path>) -> Result<EmbeddingProviderConfig> {
        let file = read_file(config_path)?;
        Self::resolve_embeddings(&file, |key| std::env::var(key).ok())
    }

    /// Embedding half of [`AppConfig::resolve`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for invalid values.
    pub fn resolve_embeddings(
        file: &RagDocsConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<EmbeddingProviderConfig> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        resolve_embeddings(file.embeddings.as_ref(), &env)
    }

    /// Resolve from explicit sources. `env` looks up one variable.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::load`], minus file errors.
    pub fn resolve(
        file: &RagDocsConfig,
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        // Empty variables count as unset
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let connection = resolve_connection(file.qdrant.as_ref(), overrides, &env)?;
        let embeddings = resolve_embeddings(file.embeddings.as_ref(), &env)?;
        let collection = resolve_collection(file.collection.as_ref(), embeddings.dimensions)?;

        let default_collection = overrides
            .collection
            .clone()
            .or_else(|| env("RAGDOCS_COLLECTION"))
            .or_else(|| file.collection.as_ref().and_then(|c| c.name.clone()))
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

        Ok(Self {
            connection,
            embeddings,
            collection,
            default_collection,
        })
    }
}

fn read_file(config_path: Option<&Path>) -> Result<RagDocsConfig> {
    match config_path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => load_config(&path),
        None => Ok(RagDocsConfig::default()),
    }
}

fn resolve_connection(
    file: Option<&QdrantSettings>,
    overrides: &Overrides,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<ConnectionConfig> {
    let url = overrides
        .qdrant_url
        .clone()
        .or_else(|| env("QDRANT_URL"))
        .or_else(|| file.and_then(|q| q.url.clone()))
        .unwrap_or_else(|| DEFAULT_QDRANT_URL.to_string());

    let api_key = overrides
        .qdrant_api_key
        .clone()
        .filter(|k| !k.is_empty())
        .or_else(|| env("QDRANT_API_KEY"))
        .or_else(|| file.and_then(|q| q.api_key.clone()))
        .ok_or_else(|| {
            Error::Config("QDRANT_API_KEY is required to connect to Qdrant".into())
        })?;

    let timeout_secs = match env("QDRANT_TIMEOUT_SECS") {
        Some(raw) => parse_positive("QDRANT_TIMEOUT_SECS", &raw)?,
        None => file.and_then(|q| q.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS),
    };
    if timeout_secs == 0 {
        return Err(Error::Config("QDRANT_TIMEOUT_SECS must be positive".into()));
    }

    Ok(ConnectionConfig { url, api_key, timeout_secs })
}

fn resolve_embeddings(
    file: Option<&EmbeddingSettings>,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<EmbeddingProviderConfig> {
    let provider = match env("EMBEDDING_PROVIDER") {
        Some(raw) => raw.parse::<EmbeddingProviderType>().map_err(Error::Config)?,
        None => file.and_then(|e| e.provider).unwrap_or_default(),
    };

    let (model_var, endpoint_var) = match provider {
        EmbeddingProviderType::Ollama => (Some("OLLAMA_MODEL"), Some("OLLAMA_ENDPOINT")),
        EmbeddingProviderType::Huggingface => (Some("HF_MODEL"), Some("HF_ENDPOINT")),
        EmbeddingProviderType::Model2vec => (None, None),
    };

    let model = env("EMBEDDING_MODEL")
        .or_else(|| model_var.and_then(|v| env(v)))
        .or_else(|| file.and_then(|e| e.model.clone()));

    let mut config = match model {
        Some(model) => EmbeddingProviderConfig::for_model(provider, model),
        None => EmbeddingProviderConfig::for_provider(provider),
    };

    config.endpoint = endpoint_var
        .and_then(|v| env(v))
        .or_else(|| file.and_then(|e| e.endpoint.clone()));
    config.token = env("HF_TOKEN").or_else(|| file.and_then(|e| e.token.clone()));

    if let Some(raw) = env("EMBEDDING_DIMENSIONS") {
        config.dimensions = usize::try_from(parse_positive("EMBEDDING_DIMENSIONS", &raw)?)
            .map_err(|e| Error::Config(format!("EMBEDDING_DIMENSIONS out of range: {e}")))?;
    } else if let Some(dimensions) = file.and_then(|e| e.dimensions) {
        config.dimensions = dimensions;
    }

    config.validate()?;
    Ok(config)
}

fn resolve_collection(
    file: Option<&CollectionFileSettings>,
    dimensions: usize,
) -> Result<CollectionSettings> {
    let defaults = OptimizerHints::default();
    let mut settings = CollectionSettings::with_vector_size(dimensions as u64);

    if let Some(file) = file {
        if let Some(vector_size) = file.vector_size {
            if vector_size != dimensions as u64 {
                return Err(Error::DimensionMismatch { vector_size, dimensions });
            }
        }
        settings.distance = file.distance.unwrap_or(settings.distance);
        settings.optimizers = OptimizerHints {
            default_segment_number: file
                .default_segment_number
                .unwrap_or(defaults.default_segment_number),
            memmap_threshold: file.memmap_threshold.unwrap_or(defaults.memmap_threshold),
        };
        settings.replication_factor = file.replication_factor.unwrap_or(settings.replication_factor);
    }

    settings.validate()?;
    Ok(settings)
}

fn parse_positive(name: &str, raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(Error::Config(format!(
            "{name} must be a positive integer, got '{raw}'"
        ))),
        Ok(n) => Ok(n),
    }
}
