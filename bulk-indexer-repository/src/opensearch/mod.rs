//! OpenSearch implementation of the bulk-write client.
//!
//! This module provides a concrete implementation of `BulkWriteClient`
//! using OpenSearch as the backend. The `_bulk` and ping endpoints it uses
//! are wire-compatible with Elasticsearch.

mod bulk;
mod client;

pub use bulk::{build_bulk_body, parse_bulk_response};
pub use client::OpenSearchClient;
