//! Command implementations.
//!
//! Network commands share one [`RunContext`]: it resolves the configuration,
//! builds the orchestrator inside a tokio runtime, and applies `--timeout`.
//! `embed` only needs a gateway and skips the store entirely.

pub mod add;
pub mod collection;
pub mod completions;
pub mod config;
pub mod embed;
pub mod search;
pub mod status;
pub mod version;

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{default_config_path, AppConfig, Overrides};
use crate::embeddings::{
    create_embedding_provider, BoxedProvider, EmbeddingGateway, EmbeddingProviderConfig,
};
use crate::error::{Error, Result};
use crate::orchestrator::RetrievalOrchestrator;
use crate::store::QdrantStore;

/// The orchestrator used by every CLI command.
pub type CliOrchestrator = RetrievalOrchestrator<BoxedProvider, QdrantStore>;

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub config_path: Option<PathBuf>,
    pub overrides: Overrides,
    pub timeout_secs: Option<u64>,
    pub json: bool,
}

impl RunContext {
    /// Config file path in effect.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no home directory can be found.
    pub fn config_file(&self) -> Result<PathBuf> {
        self.config_path
            .clone()
            .or_else(default_config_path)
            .ok_or_else(|| Error::Config("Could not determine home directory for config file".into()))
    }

    /// Resolve the full configuration.
    ///
    /// # Errors
    ///
    /// Any resolution error from [`AppConfig::load`].
    pub fn load_config(&self) -> Result<AppConfig> {
        AppConfig::load(self.config_path.as_deref(), &self.overrides)
    }

    /// Resolve only the embedding settings; no Qdrant credential needed.
    ///
    /// # Errors
    ///
    /// Any resolution error from [`AppConfig::load_embeddings`].
    pub fn load_embedding_config(&self) -> Result<EmbeddingProviderConfig> {
        AppConfig::load_embeddings(self.config_path.as_deref())
    }

    /// Collection named by `explicit`, else the configured default.
    #[must_use]
    pub fn collection_name(&self, config: &AppConfig, explicit: Option<&str>) -> String {
        explicit.map_or_else(|| config.default_collection.clone(), str::to_string)
    }

    /// Run `op` against a freshly built orchestrator under the deadline.
    ///
    /// # Errors
    ///
    /// Configuration or construction errors, `Error::Timeout` on expiry, or
    /// whatever `op` returns.
    pub fn run<T, F, Fut>(&self, config: &AppConfig, op: F) -> Result<T>
    where
        F: FnOnce(CliOrchestrator) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.block_on(async {
            let orchestrator = build_orchestrator(config)?;
            op(orchestrator).await
        })
    }

    /// Run a future to completion on a new runtime, abandoning it if the
    /// deadline passes.
    ///
    /// # Errors
    ///
    /// `Error::Timeout` on expiry, or the future's own error.
    pub fn block_on<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

        rt.block_on(async {
            match self.timeout_secs {
                Some(secs) => tokio::time::timeout(Duration::from_secs(secs), fut)
                    .await
                    .map_err(|_| Error::Timeout { secs })?,
                None => fut.await,
            }
        })
    }
}

/// Build the store, provider and orchestrator from resolved config.
///
/// Must run inside a tokio runtime; no request is sent yet.
///
/// # Errors
///
/// `Error::Config` for a bad URL or missing provider credential, or
/// `Error::DimensionMismatch`.
pub fn build_orchestrator(config: &AppConfig) -> Result<CliOrchestrator> {
    let store = QdrantStore::connect(&config.connection)?;
    let gateway = build_gateway(&config.embeddings)?;
    RetrievalOrchestrator::new(gateway, store, config.collection.clone())
}

/// Build the configured provider behind an [`EmbeddingGateway`].
///
/// # Errors
///
/// `Error::Config` for a missing provider credential or invalid settings.
pub fn build_gateway(config: &EmbeddingProviderConfig) -> Result<EmbeddingGateway<BoxedProvider>> {
    let provider = create_embedding_provider(config)?;
    EmbeddingGateway::new(provider, config.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::EmbeddingProviderType;
    use crate::error::ErrorKind;

    #[test]
    fn test_block_on_times_out() {
        let ctx = RunContext {
            timeout_secs: Some(1),
            ..Default::default()
        };
        let err = ctx
            .block_on(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { secs: 1 }));
        assert_eq!(err.kind(), ErrorKind::InternalError);
    }

    #[test]
    fn test_build_gateway_needs_no_store() {
        let config = EmbeddingProviderConfig::for_provider(EmbeddingProviderType::Ollama);
        let gateway = build_gateway(&config).unwrap();
        assert_eq!(gateway.dimensions(), 768);
    }

    #[test]
    fn test_block_on_without_deadline() {
        let ctx = RunContext::default();
        assert_eq!(ctx.block_on(async { Ok(7) }).unwrap(), 7);
    }
}
