//! Document type submitted to the search engine.

use serde_json::{Map, Value};

/// A normalized record ready for bulk submission.
///
/// The body is a free-form map of field names to JSON values. Routing
/// metadata lives next to it: the target index is required at construction,
/// so a document can never reach the bulk API without one. The ID is
/// optional; when absent the search engine assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    index: String,
    id: Option<String>,
    fields: Map<String, Value>,
}

impl Document {
    /// Create an empty document routed to `index`.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: None,
            fields: Map::new(),
        }
    }

    /// Create a document routed to `index` with the given body.
    pub fn with_fields(index: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            index: index.into(),
            id: None,
            fields,
        }
    }

    /// Set the document ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set a single field, replacing any previous value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The index this document is routed to.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// The document ID, if one was assigned before submission.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The document body.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a single field of the body.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Consume the document and return its body.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}
