//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `BulkWriteClient`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::ConnectionConfig;
use crate::errors::SearchError;
use crate::interfaces::BulkWriteClient;
use crate::opensearch::bulk::{build_bulk_body, parse_bulk_response};
use bulk_indexer_shared::{BulkOutcome, Document};

/// OpenSearch client implementation.
///
/// Talks to a single node using basic authentication. The underlying
/// transport is safe to share between tasks, so one instance serves every
/// submission worker.
///
/// # Example
///
/// ```ignore
/// use bulk_indexer_repository::{ConnectionConfig, OpenSearchClient};
/// let config = ConnectionConfig::new("https://localhost:9200", "elastic", "changeme");
/// let client = OpenSearchClient::new(&config)?;
///
/// let outcomes = client.bulk_write(&documents).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client for the configured cluster.
    ///
    /// No request is sent; call `ping` to verify connectivity.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or the transport cannot be built
    pub fn new(config: &ConnectionConfig) -> Result<Self, SearchError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .auth(Credentials::Basic(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %config.url,
            username = %config.username,
            "Created OpenSearch client"
        );

        Ok(Self { client })
    }
}

#[async_trait]
impl BulkWriteClient for OpenSearchClient {
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn bulk_write(&self, documents: &[Document]) -> Result<Vec<BulkOutcome>, SearchError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(build_bulk_body(documents))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchError::rejected(status.as_u16(), error_body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let outcomes = parse_bulk_response(documents, &body);
        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        debug!(
            succeeded = outcomes.len() - failed,
            failed = failed,
            "Bulk request acknowledged"
        );

        Ok(outcomes)
    }

    async fn ping(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            error!(status = %status, "Ping returned a failure status");
        }

        Ok(status.is_success())
    }
}
