//! Vector store data model.
//!
//! Collection schema, points written by the orchestrator, and hits returned
//! by similarity search.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Similarity function used by the store to rank neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Cosine,
    #[serde(alias = "euclid")]
    Euclidean,
    Dot,
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cosine => write!(f, "Cosine"),
            Self::Euclidean => write!(f, "Euclidean"),
            Self::Dot => write!(f, "Dot"),
        }
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "euclidean" | "euclid" | "l2" => Ok(Self::Euclidean),
            "dot" | "dotproduct" | "dot_product" => Ok(Self::Dot),
            _ => Err(format!("Unknown distance metric: {s}")),
        }
    }
}

/// Optimizer hints sent with collection creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerHints {
    pub default_segment_number: u64,
    pub memmap_threshold: u64,
}

impl Default for OptimizerHints {
    fn default() -> Self {
        Self {
            default_segment_number: 2,
            memmap_threshold: 20_000,
        }
    }
}

/// Collection layout shared by every collection this process creates.
///
/// The name is supplied per request; see [`CollectionSettings::schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSettings {
    pub vector_size: u64,
    pub distance: DistanceMetric,
    pub optimizers: OptimizerHints,
    pub replication_factor: u32,
}

impl CollectionSettings {
    /// Settings for a given vector size with default metric and hints.
    #[must_use]
    pub fn with_vector_size(vector_size: u64) -> Self {
        Self {
            vector_size,
            distance: DistanceMetric::default(),
            optimizers: OptimizerHints::default(),
            replication_factor: 2,
        }
    }

    /// Reject values the store would refuse anyway.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for a zero vector size or replication factor.
    pub fn validate(&self) -> Result<()> {
        if self.vector_size == 0 {
            return Err(Error::Config("collection vector_size must be positive".into()));
        }
        if self.replication_factor == 0 {
            return Err(Error::Config("collection replication_factor must be positive".into()));
        }
        Ok(())
    }

    /// Full schema for the named collection.
    #[must_use]
    pub fn schema(&self, name: &str) -> CollectionSchema {
        CollectionSchema {
            name: name.to_string(),
            vector_size: self.vector_size,
            distance: self.distance,
            optimizers: self.optimizers,
            replication_factor: self.replication_factor,
        }
    }
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self::with_vector_size(768)
    }
}

/// Everything the store needs to create one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSchema {
    pub name: String,
    pub vector_size: u64,
    pub distance: DistanceMetric,
    pub optimizers: OptimizerHints,
    pub replication_factor: u32,
}

/// Payload stored alongside each vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub text: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub chunk_index: u64,
    /// RFC 3339 timestamp.
    pub indexed_at: String,
}

/// A vector plus payload, ready for upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPoint {
    /// UUID string.
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: DocumentPayload,
}

/// One similarity search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub text: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_nomic() {
        let settings = CollectionSettings::default();
        assert_eq!(settings.vector_size, 768);
        assert_eq!(settings.distance, DistanceMetric::Cosine);
        assert_eq!(settings.optimizers.default_segment_number, 2);
        assert_eq!(settings.optimizers.memmap_threshold, 20_000);
        assert_eq!(settings.replication_factor, 2);
    }

    #[test]
    fn test_schema_carries_name() {
        let schema = CollectionSettings::with_vector_size(384).schema("docs");
        assert_eq!(schema.name, "docs");
        assert_eq!(schema.vector_size, 384);
        assert_eq!(schema.distance.to_string(), "Cosine");
    }

    #[test]
    fn test_validate_rejects_zero() {
        let mut settings = CollectionSettings::with_vector_size(0);
        assert!(settings.validate().is_err());

        settings.vector_size = 16;
        settings.replication_factor = 0;
        assert!(settings.validate().is_err());

        settings.replication_factor = 1;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_distance_parse() {
        assert_eq!("COSINE".parse::<DistanceMetric>(), Ok(DistanceMetric::Cosine));
        assert_eq!("euclid".parse::<DistanceMetric>(), Ok(DistanceMetric::Euclidean));
        assert_eq!("dot_product".parse::<DistanceMetric>(), Ok(DistanceMetric::Dot));
        assert!("manhattan".parse::<DistanceMetric>().is_err());
    }

    #[test]
    fn test_distance_serde_lowercase() {
        let json = serde_json::to_string(&DistanceMetric::Euclidean).unwrap();
        assert_eq!(json, "\"euclidean\"");
        let parsed: DistanceMetric = serde_json::from_str("\"euclid\"").unwrap();
        assert_eq!(parsed, DistanceMetric::Euclidean);
    }
}
