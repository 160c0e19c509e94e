//! # Bulk Indexer Pipeline
//!
//! This crate provides the ingestion pipeline that turns local files into
//! bulk-indexed search documents.
//!
//! ## Architecture
//!
//! Each input file flows through:
//!
//! 1. **Format**: Classifies the file as a plain list, JSON-Lines or a JSON array
//! 2. **Resolver**: Derives the target index name from the file path
//! 3. **Source**: Produces normalized documents from the file
//! 4. **Engine**: Submits documents concurrently through the bulk-write API
//! 5. **Orchestrator**: Sequences files and reports progress and failures

pub mod engine;
pub mod errors;
pub mod format;
pub mod orchestrator;
pub mod resolver;
pub mod source;

pub use engine::{BulkWriteEngine, EngineConfig, OutcomeStream};
pub use errors::PipelineError;
pub use orchestrator::{
    IngestPlan, IngestionJob, Orchestrator, PlanInput, ProgressReporter, RunSummary,
};
