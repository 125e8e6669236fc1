//! ragdocs - document retrieval over a vector store
//!
//! Provisions Qdrant collections idempotently, turns text into embeddings
//! through a pluggable provider, and reports every failure as one of a small
//! set of stable error kinds.
//!
//! # Architecture
//!
//! - [`orchestrator`] - Composes embeddings and store; the outward API
//! - [`embeddings`] - Embedding providers (Ollama, HuggingFace, Model2Vec) and chunking
//! - [`store`] - Vector store trait, Qdrant backend, provisioning, failure classification
//! - [`config`] - Configuration resolution (flags, environment, config file)
//! - [`cli`] - Command-line interface using clap
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod orchestrator;
pub mod store;

pub use error::{Error, ErrorKind, Result};
pub use orchestrator::{Document, IndexReport, RetrievalOrchestrator};
