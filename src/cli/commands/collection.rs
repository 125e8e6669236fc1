//! Collection command implementation.

use colored::Colorize;
use serde::Serialize;

use super::RunContext;
use crate::cli::CollectionCommands;
use crate::error::Result;
use crate::store::{CollectionSettings, Provisioned};

#[derive(Serialize)]
struct EnsureOutput<'a> {
    collection: &'a str,
    created: bool,
    status: &'static str,
    settings: &'a CollectionSettings,
}

#[derive(Serialize)]
struct ListOutput<'a> {
    collections: &'a [String],
    count: usize,
}

/// Execute collection commands.
///
/// # Errors
///
/// Returns configuration, store or timeout errors.
pub fn execute(command: &CollectionCommands, ctx: &RunContext) -> Result<()> {
    match command {
        CollectionCommands::Ensure { name } => execute_ensure(name.as_deref(), ctx),
        CollectionCommands::List => execute_list(ctx),
    }
}

fn execute_ensure(name: Option<&str>, ctx: &RunContext) -> Result<()> {
    let config = ctx.load_config()?;
    let collection = ctx.collection_name(&config, name);

    let target = collection.clone();
    let provisioned = ctx.run(&config, |orchestrator| async move {
        orchestrator.ensure_collection(&target).await
    })?;

    let status = match provisioned {
        Provisioned::Existing => "existing",
        Provisioned::Created => "created",
        Provisioned::CreatedConcurrently => "created_concurrently",
    };

    if ctx.json {
        let output = EnsureOutput {
            collection: &collection,
            created: !provisioned.was_present(),
            status,
            settings: &config.collection,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if provisioned.was_present() {
        println!("{} Collection '{}' already exists", "✓".green(), collection.bold());
    } else {
        println!(
            "{} Created collection '{}' ({} dims, {})",
            "✓".green(),
            collection.bold(),
            config.collection.vector_size,
            config.collection.distance
        );
    }

    Ok(())
}

fn execute_list(ctx: &RunContext) -> Result<()> {
    let config = ctx.load_config()?;
    let collections = ctx.run(&config, |orchestrator| async move {
        orchestrator.list_collections().await
    })?;

    if ctx.json {
        let output = ListOutput {
            collections: &collections,
            count: collections.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if collections.is_empty() {
        println!("No collections.");
        return Ok(());
    }

    println!("Collections ({}):", collections.len());
    for name in &collections {
        let marker = if *name == config.default_collection { " (default)".dimmed().to_string() } else { String::new() };
        println!("  {name}{marker}");
    }
    Ok(())
}
