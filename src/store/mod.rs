//! Vector store gateway.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ RetrievalOrchestrator│
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │ CollectionProvisioner│  ← list, then create if absent
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │  VectorStore (trait) │  ← typed RPC surface
//! └──────────┬───────────┘
//!            │
//!            ▼
//!      QdrantStore ── gRPC ──▶ Qdrant
//!            │
//!            ▼
//!    classify_status()       ← gRPC code, then text → StoreFailure
//! ```

pub mod classify;
pub mod client;
pub mod provisioner;
pub mod qdrant;
pub mod types;

pub use classify::{classify_failure, classify_status, StoreFailure, StoreResult};
pub use client::VectorStore;
pub use provisioner::{CollectionProvisioner, Provisioned};
pub use qdrant::QdrantStore;
pub use types::{
    CollectionSchema, CollectionSettings, DistanceMetric, DocumentPayload, OptimizerHints,
    SearchHit, StoredPoint,
};
