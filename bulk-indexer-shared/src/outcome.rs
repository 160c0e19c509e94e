//! Per-document result of a bulk submission.

use std::fmt;

use crate::Document;

/// Result of submitting a single document through the bulk-write API.
///
/// Exactly one outcome exists per submitted document. The error detail is
/// present if and only if the document was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    index: String,
    id: Option<String>,
    status: Option<u16>,
    error: Option<String>,
}

impl BulkOutcome {
    /// Outcome for a document the engine accepted.
    ///
    /// `assigned_id` is the ID reported back by the engine; it is used when
    /// the document was submitted without one.
    pub fn success(document: &Document, status: Option<u16>, assigned_id: Option<&str>) -> Self {
        Self {
            index: document.index().to_string(),
            id: document.id().or(assigned_id).map(str::to_string),
            status,
            error: None,
        }
    }

    /// Outcome for a document the engine rejected.
    pub fn failure(document: &Document, status: Option<u16>, detail: impl Into<String>) -> Self {
        Self {
            index: document.index().to_string(),
            id: document.id().map(str::to_string),
            status,
            error: Some(detail.into()),
        }
    }

    /// Whether the document was accepted.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Index the document was routed to.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Document ID, either the submitted one or the one the engine assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// HTTP status of the item, when the engine reported one.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Rejection detail. `None` for successful outcomes.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Formats as `<index>/<id>`, or `<index>/<auto>` when no ID is known.
impl fmt::Display for BulkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}/{}", self.index, id),
            None => write!(f, "{}/<auto>", self.index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_uses_assigned_id_only_when_missing() {
        let with_id = Document::new("subdomains").with_id("example.com");
        let without_id = Document::new("subdomains");

        let outcome = BulkOutcome::success(&with_id, Some(201), Some("xyz"));
        assert_eq!(outcome.id(), Some("example.com"));
        assert!(outcome.is_success());
        assert!(outcome.error().is_none());

        let outcome = BulkOutcome::success(&without_id, Some(201), Some("xyz"));
        assert_eq!(outcome.id(), Some("xyz"));
    }

    #[test]
    fn test_failure_carries_detail() {
        let doc = Document::new("nuclei");
        let outcome = BulkOutcome::failure(&doc, Some(400), "mapper_parsing_exception: bad");

        assert!(!outcome.is_success());
        assert_eq!(outcome.status(), Some(400));
        assert_eq!(outcome.error(), Some("mapper_parsing_exception: bad"));
        assert_eq!(outcome.to_string(), "nuclei/<auto>");
    }
}
