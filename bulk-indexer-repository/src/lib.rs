//! # Bulk Indexer Repository
//!
//! This crate provides the bulk-write seam between the ingestion pipeline and
//! the search engine. It includes the error type, the `BulkWriteClient`
//! interface, connection settings and a concrete implementation for
//! OpenSearch/Elasticsearch-compatible clusters.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;

pub use config::ConnectionConfig;
pub use errors::SearchError;
pub use interfaces::BulkWriteClient;
pub use opensearch::OpenSearchClient;
