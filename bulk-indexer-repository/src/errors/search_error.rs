//! Search error types.
//!
//! These errors describe failures of a whole request against the search
//! engine. Rejections of individual documents inside a bulk request are not
//! errors; they are reported as failed `BulkOutcome`s.

use thiserror::Error;

/// Errors that can occur while talking to the search engine.
#[derive(Error, Debug, Clone)]
pub enum SearchError {
    /// The search engine could not be reached or the request did not complete.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The search engine answered the whole request with a non-success status.
    #[error("Request rejected with status {status}: {message}")]
    RequestRejected { status: u16, message: String },

    /// Failed to parse the response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a request rejection error.
    pub fn rejected(status: u16, msg: impl Into<String>) -> Self {
        Self::RequestRejected {
            status,
            message: msg.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Whether resending the same request may succeed.
    ///
    /// Connection failures and overload statuses (429, 502, 503, 504) are
    /// transient; everything else will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) => true,
            Self::RequestRejected { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            Self::ParseError(_) => false,
        }
    }

    /// Whether the cluster refused the request without applying any of it.
    ///
    /// Only 429 and 503 qualify. A connection error or gateway status may
    /// arrive after the bulk was already written.
    pub fn is_overload(&self) -> bool {
        matches!(self, Self::RequestRejected { status: 429 | 503, .. })
    }
}
