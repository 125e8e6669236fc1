//! Search command implementation.

use colored::Colorize;
use serde::Serialize;

use super::RunContext;
use crate::error::Result;
use crate::store::SearchHit;

/// Characters of hit text shown in human output.
const PREVIEW_CHARS: usize = 200;

#[derive(Serialize)]
struct SearchOutput<'a> {
    collection: &'a str,
    query: &'a str,
    hits: &'a [SearchHit],
    count: usize,
}

/// Execute the search command.
///
/// # Errors
///
/// Returns configuration, provisioning, embedding, store or timeout errors.
pub fn execute(query: &str, limit: usize, ctx: &RunContext) -> Result<()> {
    let config = ctx.load_config()?;
    let collection = ctx.collection_name(&config, None);

    let target = collection.clone();
    let input = query.to_string();
    let hits = ctx.run(&config, |orchestrator| async move {
        orchestrator.search(&target, &input, limit).await
    })?;

    if ctx.json {
        let output = SearchOutput {
            collection: &collection,
            query,
            hits: &hits,
            count: hits.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results in '{collection}'.");
        return Ok(());
    }

    for (rank, hit) in hits.iter().enumerate() {
        let title = hit.title.as_deref().unwrap_or(&hit.source);
        println!("{}. {} {}", rank + 1, title.bold(), format!("[{:.3}]", hit.score).dimmed());
        if hit.title.is_some() {
            println!("   {}", hit.source.dimmed());
        }
        println!("   {}", preview(&hit.text));
        println!();
    }
    Ok(())
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_flattens_and_truncates() {
        assert_eq!(preview("a\n\n b   c"), "a b c");
        let long = "é".repeat(PREVIEW_CHARS + 10);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 1);
        assert!(shown.ends_with('…'));
    }
}
