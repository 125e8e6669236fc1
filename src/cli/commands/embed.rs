//! Embed command implementation.

use serde::Serialize;

use super::{build_gateway, RunContext};
use crate::error::Result;

/// Values shown without `--full`.
const SAMPLE_LEN: usize = 5;

#[derive(Serialize)]
struct EmbedOutput<'a> {
    provider: String,
    model: &'a str,
    dimensions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    embedding: Option<&'a [f32]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    embedding_sample: Option<&'a [f32]>,
}

/// Execute the embed command. Only the embedding provider is contacted.
///
/// # Errors
///
/// Returns configuration, embedding or timeout errors.
pub fn execute(text: &str, full: bool, ctx: &RunContext) -> Result<()> {
    let config = ctx.load_embedding_config()?;
    let vector = ctx.block_on(async { build_gateway(&config)?.embed(text).await })?;

    let sample = &vector[..vector.len().min(SAMPLE_LEN)];

    if ctx.json {
        let output = EmbedOutput {
            provider: config.provider.to_string(),
            model: &config.model,
            dimensions: vector.len(),
            embedding: full.then_some(vector.as_slice()),
            embedding_sample: (!full).then_some(sample),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("Provider:   {}", config.provider);
    println!("Model:      {}", config.model);
    println!("Dimensions: {}", vector.len());
    if full {
        println!("{vector:?}");
    } else {
        println!("Sample:     {sample:?}");
    }
    Ok(())
}
