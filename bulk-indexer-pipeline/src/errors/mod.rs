//! Error types for the bulk indexer pipeline.

use bulk_indexer_repository::SearchError;
use thiserror::Error;

/// Errors that can occur in the ingestion pipeline.
///
/// `ResolutionError`, `NoInput` and `ConnectionError` are fatal to the whole
/// run. Every other variant is fatal to the file being ingested only.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An input file or directory could not be read.
    #[error("Read error: {0}")]
    ReadError(String),

    /// An input file does not have the expected structure.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A record lacks the field configured as its document ID.
    #[error("Missing ID field: {0}")]
    MissingIdField(String),

    /// A record's ID value cannot be used as a document ID.
    #[error("Invalid ID: {0}")]
    InvalidId(String),

    /// No strategy exists to determine the target index.
    #[error("{0}")]
    ResolutionError(String),

    /// Neither a file nor a directory was given.
    #[error("No input provided. Use --file or --dir")]
    NoInput,

    /// The search engine failed its liveness check.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The producer side of the submission queue went away unexpectedly.
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// A bulk request failed as a whole.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),
}

impl PipelineError {
    /// Create a read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::ReadError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a missing ID field error.
    pub fn missing_id_field(msg: impl Into<String>) -> Self {
        Self::MissingIdField(msg.into())
    }

    /// Create an invalid ID error.
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Create a resolution error.
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::ResolutionError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::ChannelError(msg.into())
    }
}
