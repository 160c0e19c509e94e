//! Bulk-write client trait definition.
//!
//! This module defines the abstract interface the ingestion pipeline depends
//! on, allowing for different backend implementations (OpenSearch,
//! Elasticsearch, in-memory fakes for tests).

use async_trait::async_trait;

use crate::errors::SearchError;
use bulk_indexer_shared::{BulkOutcome, Document};

/// Abstract interface for bulk submission to a search engine.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: one client is shared read-only by
/// every submission worker.
///
/// # Error Handling
///
/// A returned `Err` means the request as a whole failed (engine unreachable,
/// request rejected, unreadable response). Rejections of single documents are
/// reported as failed outcomes inside `Ok`.
#[async_trait]
pub trait BulkWriteClient: Send + Sync {
    /// Submit documents in one bulk request.
    ///
    /// # Arguments
    ///
    /// * `documents` - The documents to index; each carries its own target index
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<BulkOutcome>)` - One outcome per document, in request order
    /// * `Err(SearchError)` - If the request as a whole failed
    async fn bulk_write(&self, documents: &[Document]) -> Result<Vec<BulkOutcome>, SearchError>;

    /// Check that the search engine is reachable and accepts our credentials.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the engine answered the liveness check
    /// * `Ok(false)` - If the engine answered with a failure status
    /// * `Err(SearchError)` - If the check could not be executed
    async fn ping(&self) -> Result<bool, SearchError>;
}
