//! Add command implementation.

use colored::Colorize;

use super::RunContext;
use crate::cli::AddArgs;
use crate::error::{Error, Result};
use crate::orchestrator::Document;

/// Execute the add command.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if no source can be determined, or any
/// I/O, provisioning, embedding, store or timeout error.
pub fn execute(args: &AddArgs, ctx: &RunContext) -> Result<()> {
    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => {
            return Err(Error::InvalidArgument("Provide document text or --file".into()));
        }
    };

    // A file is its own source unless one is given
    let source = args
        .source
        .clone()
        .or_else(|| args.file.as_ref().map(|p| p.display().to_string()))
        .ok_or_else(|| Error::InvalidArgument("--source is required when adding inline text".into()))?;

    let config = ctx.load_config()?;
    let collection = ctx.collection_name(&config, None);

    let document = Document {
        text,
        source,
        title: args.title.clone(),
    };
    let target = collection.clone();
    let report = ctx.run(&config, |orchestrator| async move {
        orchestrator.add_document(&target, &document).await
    })?;

    if ctx.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!(
            "{} Indexed {} chunk(s) from {} into '{}'",
            "✓".green(),
            report.chunks,
            report.source,
            collection.bold()
        );
    }
    Ok(())
}
