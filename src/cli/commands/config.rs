//! Config command implementation.
//!
//! - `show` - print the config file with secrets redacted
//! - `set` - merge values into the config file
//! - `reset` - delete the config file

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use super::RunContext;
use crate::cli::{ConfigCommands, ConfigSetArgs};
use crate::config::{
    load_config, save_config, CollectionFileSettings, EmbeddingSettings, QdrantSettings,
    RagDocsConfig,
};
use crate::embeddings::EmbeddingProviderType;
use crate::error::{Error, Result};
use crate::store::DistanceMetric;

#[derive(Serialize)]
struct ShowOutput<'a> {
    path: String,
    exists: bool,
    config: &'a RagDocsConfig,
}

#[derive(Serialize)]
struct SetOutput<'a> {
    success: bool,
    path: String,
    config: &'a RagDocsConfig,
}

#[derive(Serialize)]
struct ResetOutput {
    success: bool,
    path: String,
    removed: bool,
}

/// Execute config commands.
///
/// # Errors
///
/// Returns `Error::Config` for unreadable or unwritable files and
/// `Error::InvalidArgument` for bad values or an empty `set`.
pub fn execute(command: &ConfigCommands, ctx: &RunContext) -> Result<()> {
    let path = ctx.config_file()?;
    match command {
        ConfigCommands::Show => execute_show(&path, ctx.json),
        ConfigCommands::Set(args) => execute_set(&path, args, ctx.json),
        ConfigCommands::Reset => execute_reset(&path, ctx.json),
    }
}

fn execute_show(path: &Path, json: bool) -> Result<()> {
    let config = load_config(path)?.redacted();

    if json {
        let output = ShowOutput {
            path: path.display().to_string(),
            exists: path.exists(),
            config: &config,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("{}", "(not created yet; defaults and environment apply)".dimmed());
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn execute_set(path: &Path, args: &ConfigSetArgs, json: bool) -> Result<()> {
    let update = update_from_args(args)?;
    if update == RagDocsConfig::default() {
        return Err(Error::InvalidArgument(
            "Nothing to set. Pass at least one option (see `ragdocs config set --help`)".into(),
        ));
    }

    let merged = load_config(path)?.merge(update);
    save_config(path, &merged)?;
    tracing::info!(path = %path.display(), "config saved");

    let shown = merged.redacted();
    if json {
        let output = SetOutput {
            success: true,
            path: path.display().to_string(),
            config: &shown,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{} Saved {}", "✓".green(), path.display());
        println!("{}", serde_json::to_string_pretty(&shown)?);
    }
    Ok(())
}

fn execute_reset(path: &Path, json: bool) -> Result<()> {
    let removed = if path.exists() {
        std::fs::remove_file(path).map_err(|e| {
            Error::Config(format!("Failed to remove config file {}: {e}", path.display()))
        })?;
        true
    } else {
        false
    };

    if json {
        let output = ResetOutput {
            success: true,
            path: path.display().to_string(),
            removed,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if removed {
        println!("{} Removed {}", "✓".green(), path.display());
    } else {
        println!("No config file at {}", path.display());
    }
    Ok(())
}

/// Build a partial config holding only the flags that were given.
fn update_from_args(args: &ConfigSetArgs) -> Result<RagDocsConfig> {
    let provider = args
        .provider
        .as_deref()
        .map(str::parse::<EmbeddingProviderType>)
        .transpose()
        .map_err(Error::InvalidArgument)?;
    let distance = args
        .distance
        .as_deref()
        .map(str::parse::<DistanceMetric>)
        .transpose()
        .map_err(Error::InvalidArgument)?;

    if args.timeout_secs == Some(0) {
        return Err(Error::InvalidArgument("--timeout-secs must be positive".into()));
    }
    if args.dimensions == Some(0) {
        return Err(Error::InvalidArgument("--dimensions must be positive".into()));
    }
    if args.replication_factor == Some(0) {
        return Err(Error::InvalidArgument("--replication-factor must be positive".into()));
    }

    let qdrant = QdrantSettings {
        url: args.url.clone(),
        api_key: args.api_key.clone(),
        timeout_secs: args.timeout_secs,
    };
    let embeddings = EmbeddingSettings {
        provider,
        model: args.model.clone(),
        endpoint: args.endpoint.clone(),
        token: args.token.clone(),
        dimensions: args.dimensions,
    };
    let collection = CollectionFileSettings {
        name: args.default_collection.clone(),
        distance,
        replication_factor: args.replication_factor,
        ..Default::default()
    };

    Ok(RagDocsConfig {
        qdrant: (qdrant != QdrantSettings::default()).then_some(qdrant),
        embeddings: (embeddings != EmbeddingSettings::default()).then_some(embeddings),
        collection: (collection != CollectionFileSettings::default()).then_some(collection),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_only_contains_given_sections() {
        let args = ConfigSetArgs {
            url: Some("http://q:6334".into()),
            ..Default::default()
        };
        let update = update_from_args(&args).unwrap();
        assert!(update.qdrant.is_some());
        assert!(update.embeddings.is_none());
        assert!(update.collection.is_none());
    }

    #[test]
    fn test_update_rejects_bad_values() {
        let args = ConfigSetArgs {
            provider: Some("openai".into()),
            ..Default::default()
        };
        assert!(update_from_args(&args).is_err());

        let args = ConfigSetArgs {
            distance: Some("manhattan".into()),
            ..Default::default()
        };
        assert!(update_from_args(&args).is_err());

        let args = ConfigSetArgs {
            replication_factor: Some(0),
            ..Default::default()
        };
        assert!(update_from_args(&args).is_err());
    }

    #[test]
    fn test_set_merges_into_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let first = ConfigSetArgs {
            api_key: Some("k1".into()),
            default_collection: Some("docs".into()),
            ..Default::default()
        };
        execute_set(&path, &first, true).unwrap();

        let second = ConfigSetArgs {
            model: Some("all-minilm".into()),
            ..Default::default()
        };
        execute_set(&path, &second, true).unwrap();

        let saved = load_config(&path).unwrap();
        assert_eq!(saved.qdrant.unwrap().api_key.as_deref(), Some("k1"));
        assert_eq!(saved.embeddings.unwrap().model.as_deref(), Some("all-minilm"));
        assert_eq!(saved.collection.unwrap().name.as_deref(), Some("docs"));

        execute_reset(&path, true).unwrap();
        assert!(!path.exists());
    }
}
