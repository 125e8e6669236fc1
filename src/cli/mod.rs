//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// ragdocs - document retrieval over Qdrant and pluggable embeddings
#[derive(Parser, Debug)]
#[command(name = "ragdocs", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (default: ~/.ragdocs/config.json)
    #[arg(long, global = true, env = "RAGDOCS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Qdrant endpoint (gRPC, usually port 6334)
    #[arg(long, global = true, env = "QDRANT_URL")]
    pub qdrant_url: Option<String>,

    /// Qdrant API key
    #[arg(long, global = true, env = "QDRANT_API_KEY", hide_env_values = true)]
    pub qdrant_api_key: Option<String>,

    /// Collection to operate on (default: documentation)
    #[arg(long, global = true, env = "RAGDOCS_COLLECTION")]
    pub collection: Option<String>,

    /// Overall deadline per operation, in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collection management
    Collection {
        #[command(subcommand)]
        command: CollectionCommands,
    },

    /// Embed a text and print the vector
    Embed {
        /// Text to embed
        text: String,

        /// Print every value instead of a sample
        #[arg(long)]
        full: bool,
    },

    /// Chunk, embed and store a document
    Add(AddArgs),

    /// Similarity search over stored documents
    Search {
        /// Query text
        query: String,

        /// Maximum hits to return
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Show configuration, provider and store status
    Status,

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Collection Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum CollectionCommands {
    /// Create the collection if it does not exist
    Ensure {
        /// Collection name (default: --collection or configured default)
        name: Option<String>,
    },

    /// List collections on the store
    List,
}

// ============================================================================
// Add
// ============================================================================

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Document text
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the document text from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Source URL or path, used for point ids
    #[arg(long)]
    pub source: Option<String>,

    /// Document title
    #[arg(long)]
    pub title: Option<String>,
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the config file (secrets redacted)
    Show,

    /// Set values in the config file; unset fields keep their value
    Set(ConfigSetArgs),

    /// Delete the config file
    Reset,
}

#[derive(Args, Debug, Default)]
pub struct ConfigSetArgs {
    /// Qdrant endpoint
    #[arg(long)]
    pub url: Option<String>,

    /// Qdrant API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Qdrant request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Embedding provider (ollama, huggingface, model2vec)
    #[arg(long)]
    pub provider: Option<String>,

    /// Embedding model
    #[arg(long)]
    pub model: Option<String>,

    /// Embedding provider endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// HuggingFace token
    #[arg(long)]
    pub token: Option<String>,

    /// Embedding dimensions
    #[arg(long)]
    pub dimensions: Option<usize>,

    /// Default collection name
    #[arg(long)]
    pub default_collection: Option<String>,

    /// Distance metric (cosine, euclidean, dot)
    #[arg(long)]
    pub distance: Option<String>,

    /// Replication factor for new collections
    #[arg(long)]
    pub replication_factor: Option<u32>,
}
