//! Status command implementation.
//!
//! Reports the resolved configuration, embedding provider availability and
//! store reachability. Store and provider failures are reported, not raised.

use colored::Colorize;
use serde::Serialize;

use super::{build_orchestrator, RunContext};
use crate::config::AppConfig;
use crate::embeddings::{detect_available_providers, EmbeddingProvider, ProviderDetection};
use crate::error::Result;

#[derive(Serialize)]
struct StatusOutput<'a> {
    config_file: Option<String>,
    config: &'a AppConfig,
    embedding: EmbeddingStatus,
    store: StoreStatus,
}

#[derive(Serialize)]
struct EmbeddingStatus {
    provider: String,
    model: String,
    dimensions: usize,
    available: bool,
    detected: ProviderDetection,
}

#[derive(Serialize)]
struct StoreStatus {
    endpoint: String,
    reachable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    collections: Vec<String>,
    default_collection_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<StoreError>,
}

#[derive(Serialize)]
struct StoreError {
    code: &'static str,
    message: String,
}

/// Execute the status command.
///
/// # Errors
///
/// Returns configuration errors, or `Error::Timeout` if the probes exceed
/// the deadline.
pub fn execute(ctx: &RunContext) -> Result<()> {
    let config = ctx.load_config()?;

    let (embedding, store) = ctx.block_on(async {
        let orchestrator = build_orchestrator(&config)?;

        let available = orchestrator.embeddings().provider().is_available().await;
        let detected = detect_available_providers(&config.embeddings).await;
        let embedding = EmbeddingStatus {
            provider: config.embeddings.provider.to_string(),
            model: config.embeddings.model.clone(),
            dimensions: config.embeddings.dimensions,
            available,
            detected,
        };

        let store = match orchestrator.list_collections().await {
            Ok(collections) => StoreStatus {
                endpoint: config.connection.url.clone(),
                reachable: true,
                default_collection_exists: collections.contains(&config.default_collection),
                collections,
                error: None,
            },
            Err(e) => StoreStatus {
                endpoint: config.connection.url.clone(),
                reachable: false,
                collections: Vec::new(),
                default_collection_exists: false,
                error: Some(StoreError {
                    code: e.kind().as_str(),
                    message: e.to_string(),
                }),
            },
        };

        Ok((embedding, store))
    })?;

    let config_file = ctx.config_file().ok().map(|p| p.display().to_string());

    if ctx.json {
        let output = StatusOutput {
            config_file,
            config: &config,
            embedding,
            store,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    let mark = |ok: bool| if ok { "✓".green() } else { "✗".red() };

    println!("{}", "ragdocs status".bold());
    println!();
    if let Some(path) = &config_file {
        println!("Config file: {path}");
    }
    println!();

    println!("Embedding:");
    println!(
        "  {} {} ({}, {} dims)",
        mark(embedding.available),
        embedding.provider,
        embedding.model,
        embedding.dimensions
    );
    if !embedding.detected.available.is_empty() {
        println!("  Detected: {}", embedding.detected.available.join(", "));
    }
    println!();

    println!("Vector store:");
    println!("  {} {}", mark(store.reachable), store.endpoint);
    if let Some(err) = &store.error {
        println!("  {}: {}", err.code.red(), err.message);
    }
    if store.reachable {
        println!(
            "  Collection '{}': {}",
            config.default_collection,
            if store.default_collection_exists { "present".green() } else { "missing".yellow() }
        );
        println!(
            "  Schema: {} dims, {}, replication {}",
            config.collection.vector_size, config.collection.distance, config.collection.replication_factor
        );
        if !store.collections.is_empty() {
            println!("  Collections: {}", store.collections.join(", "));
        }
    }

    Ok(())
}
