//! Error types for ragdocs.
//!
//! Every failure crossing the library boundary is an [`Error`], and every
//! [`Error`] belongs to exactly one outward [`ErrorKind`]:
//! - `EmbeddingFailure` - the embedding provider could not produce a vector
//! - `Unauthorized` - the vector store rejected the credential
//! - `Unreachable` - the vector store endpoint could not be reached
//! - `Unknown` - any other vector store failure (original text preserved)
//! - `InternalError` - configuration mistakes, I/O, misuse
//!
//! Callers match on the kind; humans read the message and the hint.

use thiserror::Error;

use crate::store::StoreFailure;

/// Result type alias for ragdocs operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Kind ────────────────────────────────────────────────

/// Machine-readable outward error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmbeddingFailure,
    Unauthorized,
    Unreachable,
    Unknown,
    InternalError,
}

impl ErrorKind {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EmbeddingFailure => "EMBEDDING_FAILURE",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Unreachable => "UNREACHABLE",
            Self::Unknown => "UNKNOWN",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based process exit code.
    ///
    /// 2 is left to clap for usage errors.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::Unauthorized => 3,
            Self::Unreachable => 4,
            Self::Unknown => 5,
            Self::EmbeddingFailure => 6,
        }
    }

    /// Whether retrying the same request later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unreachable | Self::EmbeddingFailure)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in ragdocs operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to generate embeddings: {0}")]
    Embedding(String),

    #[error("Failed to authenticate with Qdrant. Please check your API key (QDRANT_API_KEY).")]
    Unauthorized {
        /// Transport text, kept for logs.
        detail: String,
    },

    #[error("Failed to connect to Qdrant. Please check your QDRANT_URL.")]
    Unreachable { detail: String },

    #[error("Failed to initialize collection '{collection}': {message}")]
    CollectionInit { collection: String, message: String },

    #[error("Vector store request failed: {0}")]
    VectorStore(String),

    #[error("Dimension mismatch: collection vector size is {vector_size} but the embedding model produces {dimensions}")]
    DimensionMismatch { vector_size: u64, dimensions: usize },

    #[error("Operation timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its outward [`ErrorKind`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Embedding(_) => ErrorKind::EmbeddingFailure,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Unreachable { .. } => ErrorKind::Unreachable,
            Self::CollectionInit { .. } | Self::VectorStore(_) => ErrorKind::Unknown,
            Self::DimensionMismatch { .. }
            | Self::Timeout { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Other(_) => ErrorKind::InternalError,
        }
    }

    /// Category-based exit code, delegating to the [`ErrorKind`].
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }

    /// Wrap a store failure raised while provisioning `collection`.
    ///
    /// Unauthorized and unreachable keep their prescriptive messages; anything
    /// else names the collection and keeps the transport text verbatim.
    #[must_use]
    pub fn provisioning(collection: &str, failure: StoreFailure) -> Self {
        match failure {
            StoreFailure::AlreadyExists(message) | StoreFailure::Unknown(message) => {
                Self::CollectionInit { collection: collection.to_string(), message }
            }
            other => other.into(),
        }
    }

    /// Context-aware recovery hint for operators.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Unauthorized { .. } => Some(
                "Set QDRANT_API_KEY (or `ragdocs config set --api-key`) to a key accepted by the cluster."
                    .to_string(),
            ),
            Self::Unreachable { .. } => Some(
                "Check QDRANT_URL points at the gRPC port (usually 6334) and that the server is running."
                    .to_string(),
            ),
            Self::Embedding(msg) if msg.contains("dimension") => Some(
                "The model output does not match EMBEDDING_DIMENSIONS. Fix the model or the dimensions setting."
                    .to_string(),
            ),
            Self::Embedding(_) => Some(
                "Check the embedding provider is running (ollama serve) or that HF_TOKEN is set."
                    .to_string(),
            ),
            Self::DimensionMismatch { dimensions, .. } => Some(format!(
                "Set the collection vector_size to {dimensions} or choose a model with matching output."
            )),
            Self::Timeout { .. } => Some("Raise --timeout or check network latency.".to_string()),
            Self::Config(msg) if msg.contains("QDRANT_API_KEY") => {
                Some("Export QDRANT_API_KEY or pass --qdrant-api-key.".to_string())
            }
            Self::CollectionInit { .. }
            | Self::VectorStore(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let kind = self.kind();
        let mut obj = serde_json::json!({
            "error": {
                "code": kind.as_str(),
                "message": self.to_string(),
                "retryable": kind.is_retryable(),
                "exit_code": kind.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

impl From<StoreFailure> for Error {
    fn from(failure: StoreFailure) -> Self {
        match failure {
            StoreFailure::Unauthorized(detail) => Self::Unauthorized { detail },
            StoreFailure::Unreachable(detail) => Self::Unreachable { detail },
            StoreFailure::AlreadyExists(message) | StoreFailure::Unknown(message) => {
                Self::VectorStore(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_failures_map_to_kinds() {
        let err: Error = StoreFailure::Unauthorized("401 unauthorized".into()).into();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(err.to_string().contains("API key"));

        let err: Error = StoreFailure::Unreachable("connect ECONNREFUSED".into()).into();
        assert_eq!(err.kind(), ErrorKind::Unreachable);
        assert!(err.to_string().contains("QDRANT_URL"));

        let err: Error = StoreFailure::Unknown("disk full".into()).into();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_provisioning_keeps_original_text() {
        let err = Error::provisioning("docs", StoreFailure::Unknown("shard 3 is dead".into()));
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(
            err.to_string(),
            "Failed to initialize collection 'docs': shard 3 is dead"
        );

        let err = Error::provisioning("docs", StoreFailure::Unreachable("ETIMEDOUT".into()));
        assert_eq!(err.kind(), ErrorKind::Unreachable);
    }

    #[test]
    fn test_internal_kinds() {
        let err = Error::DimensionMismatch { vector_size: 384, dimensions: 768 };
        assert_eq!(err.kind(), ErrorKind::InternalError);
        assert_eq!(err.exit_code(), 1);
        assert!(err.hint().unwrap().contains("768"));
    }

    #[test]
    fn test_structured_json() {
        let err = Error::Embedding("ollama (nomic-embed-text): connection reset".into());
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "EMBEDDING_FAILURE");
        assert_eq!(json["error"]["retryable"], true);
        assert_eq!(json["error"]["exit_code"], 6);
        assert!(json["error"]["hint"].is_string());

        let err = Error::VectorStore("boom".into());
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "UNKNOWN");
        assert!(json["error"].get("hint").is_none());
    }
}
