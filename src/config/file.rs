//! Config file persistence.
//!
//! Settings live in `~/.ragdocs/config.json`. Every field is optional;
//! unset fields fall through to environment variables and defaults during
//! resolution.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::embeddings::EmbeddingProviderType;
use crate::error::{Error, Result};
use crate::store::DistanceMetric;

const REDACTED: &str = "********";

/// Qdrant connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QdrantSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Embedding provider settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<EmbeddingProviderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
}

/// Collection name and schema overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionFileSettings {
    /// Default collection name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<DistanceMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_segment_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memmap_threshold: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replication_factor: Option<u32>,
}

/// On-disk configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagDocsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qdrant: Option<QdrantSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<EmbeddingSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<CollectionFileSettings>,
}

impl RagDocsConfig {
    /// Overlay `update` on `self`; fields unset in `update` keep their value.
    #[must_use]
    pub fn merge(self, update: Self) -> Self {
        let qdrant = match (self.qdrant, update.qdrant) {
            (Some(existing), Some(new)) => Some(QdrantSettings {
                url: new.url.or(existing.url),
                api_key: new.api_key.or(existing.api_key),
                timeout_secs: new.timeout_secs.or(existing.timeout_secs),
            }),
            (existing, new) => new.or(existing),
        };

        let embeddings = match (self.embeddings, update.embeddings) {
            (Some(existing), Some(new)) => Some(EmbeddingSettings {
                provider: new.provider.or(existing.provider),
                model: new.model.or(existing.model),
                endpoint: new.endpoint.or(existing.endpoint),
                token: new.token.or(existing.token),
                dimensions: new.dimensions.or(existing.dimensions),
            }),
            (existing, new) => new.or(existing),
        };

        let collection = match (self.collection, update.collection) {
            (Some(existing), Some(new)) => Some(CollectionFileSettings {
                name: new.name.or(existing.name),
                vector_size: new.vector_size.or(existing.vector_size),
                distance: new.distance.or(existing.distance),
                default_segment_number: new.default_segment_number.or(existing.default_segment_number),
                memmap_threshold: new.memmap_threshold.or(existing.memmap_threshold),
                replication_factor: new.replication_factor.or(existing.replication_factor),
            }),
            (existing, new) => new.or(existing),
        };

        Self { qdrant, embeddings, collection }
    }

    /// Copy with secrets masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(q) = copy.qdrant.as_mut() {
            if q.api_key.is_some() {
                q.api_key = Some(REDACTED.to_string());
            }
        }
        if let Some(e) = copy.embeddings.as_mut() {
            if e.token.is_some() {
                e.token = Some(REDACTED.to_string());
            }
        }
        copy
    }
}

/// Default config file path: `~/.ragdocs/config.json`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".ragdocs").join("config.json"))
}

/// Load a config file; a missing file is an empty config.
///
/// # Errors
///
/// Returns `Error::Config` if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<RagDocsConfig> {
    if !path.exists() {
        return Ok(RagDocsConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {e}", path.display()))
    })
}

/// Write a config file, creating its directory.
///
/// # Errors
///
/// Returns `Error::Config` if the directory or file cannot be written.
pub fn save_config(path: &Path, config: &RagDocsConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::Config(format!("Failed to create config directory: {e}"))
        })?;
    }

    let content = serde_json::to_string_pretty(config).map_err(|e| {
        Error::Config(format!("Failed to serialize config: {e}"))
    })?;

    fs::write(path, content).map_err(|e| {
        Error::Config(format!("Failed to write config file: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, RagDocsConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = RagDocsConfig {
            qdrant: Some(QdrantSettings {
                url: Some("https://xyz.cloud.qdrant.io:6334".into()),
                api_key: Some("secret".into()),
                timeout_secs: None,
            }),
            embeddings: Some(EmbeddingSettings {
                provider: Some(EmbeddingProviderType::Ollama),
                ..Default::default()
            }),
            collection: None,
        };
        save_config(&path, &config).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"provider\": \"ollama\""));
        assert!(!raw.contains("timeout_secs"));
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let existing = RagDocsConfig {
            qdrant: Some(QdrantSettings {
                url: Some("http://a:6334".into()),
                api_key: Some("k1".into()),
                timeout_secs: Some(5),
            }),
            embeddings: None,
            collection: Some(CollectionFileSettings {
                name: Some("docs".into()),
                ..Default::default()
            }),
        };
        let update = RagDocsConfig {
            qdrant: Some(QdrantSettings {
                url: Some("http://b:6334".into()),
                ..Default::default()
            }),
            embeddings: Some(EmbeddingSettings {
                model: Some("all-minilm".into()),
                ..Default::default()
            }),
            collection: None,
        };

        let merged = existing.merge(update);
        let qdrant = merged.qdrant.unwrap();
        assert_eq!(qdrant.url.as_deref(), Some("http://b:6334"));
        assert_eq!(qdrant.api_key.as_deref(), Some("k1"));
        assert_eq!(qdrant.timeout_secs, Some(5));
        assert_eq!(merged.embeddings.unwrap().model.as_deref(), Some("all-minilm"));
        assert_eq!(merged.collection.unwrap().name.as_deref(), Some("docs"));
    }

    #[test]
    fn test_redacted_masks_secrets() {
        let config = RagDocsConfig {
            qdrant: Some(QdrantSettings {
                api_key: Some("secret".into()),
                ..Default::default()
            }),
            embeddings: Some(EmbeddingSettings {
                token: Some("hf_secret".into()),
                ..Default::default()
            }),
            collection: None,
        };
        let shown = serde_json::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("secret"));
        assert!(shown.contains(REDACTED));
    }
}
