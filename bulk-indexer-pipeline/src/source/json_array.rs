//! JSON files holding a single array of objects.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::{document_from_record, SourceOptions};
use crate::errors::PipelineError;
use bulk_indexer_shared::Document;

/// All documents of a JSON array file, parsed up front.
///
/// The whole file is buffered and parsed before anything is submitted, so
/// memory use grows with the file size. Any structural problem (top-level
/// value not an array, element not an object, missing ID field) fails the
/// file before the first document is sent.
#[derive(Debug)]
pub struct JsonArraySource {
    documents: Vec<Document>,
}

impl JsonArraySource {
    /// Read and parse a JSON array file.
    pub fn open(path: &Path, options: SourceOptions) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path)
            .map_err(|e| PipelineError::read(format!("{}: {}", path.display(), e)))?;

        let value: Value = serde_json::from_str(&content)
            .map_err(|e| PipelineError::parse(format!("{}: {}", path.display(), e)))?;

        let Value::Array(records) = value else {
            return Err(PipelineError::parse(format!(
                "{} is not a JSON list",
                path.display()
            )));
        };

        let documents = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                let location = format!("{} element {}", path.display(), position);
                match record {
                    Value::Object(record) => document_from_record(record, &options, &location),
                    _ => Err(PipelineError::parse(format!(
                        "{}: expected a JSON object",
                        location
                    ))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(path = %path.display(), count = documents.len(), "Loaded JSON array");
        Ok(Self { documents })
    }

    /// Number of documents in the file.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the array was empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Take the parsed documents.
    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_array_of_objects() {
        let file = write_file("[\n  {\"uuid\": \"a\", \"n\": 1},\n  {\"uuid\": \"b\", \"n\": 2}\n]\n");
        let mut options = SourceOptions::new("results");
        options.id_field = Some("uuid".to_string());

        let source = JsonArraySource::open(file.path(), options).unwrap();
        assert_eq!(source.len(), 2);

        let docs = source.into_documents();
        assert_eq!(docs[0].id(), Some("a"));
        assert_eq!(docs[1].id(), Some("b"));
        assert_eq!(docs[1].get("n"), Some(&json!(2)));
        assert!(docs.iter().all(|d| d.index() == "results"));
    }

    #[test]
    fn test_top_level_object_is_rejected() {
        let file = write_file("{\n  \"a\": 1\n}\n");

        let err = JsonArraySource::open(file.path(), SourceOptions::new("x")).unwrap_err();

        assert!(matches!(err, PipelineError::ParseError(_)));
        assert!(err.to_string().contains("is not a JSON list"));
    }

    #[test]
    fn test_every_record_needs_id_field() {
        let file = write_file("[{\"uuid\": \"a\"}, {\"name\": \"no id\"}]");
        let mut options = SourceOptions::new("x");
        options.id_field = Some("uuid".to_string());

        let err = JsonArraySource::open(file.path(), options).unwrap_err();

        assert!(matches!(err, PipelineError::MissingIdField(_)));
        assert!(err.to_string().contains("element 1"));
    }

    #[test]
    fn test_non_object_element_is_rejected() {
        let file = write_file("[{\"a\": 1}, 2]");
        let err = JsonArraySource::open(file.path(), SourceOptions::new("x")).unwrap_err();
        assert!(matches!(err, PipelineError::ParseError(_)));
    }

    #[test]
    fn test_empty_array() {
        let file = write_file("[]");
        let source = JsonArraySource::open(file.path(), SourceOptions::new("x")).unwrap();
        assert!(source.is_empty());
    }

    #[test]
    fn test_truncated_file_is_parse_error() {
        let file = write_file("[{\"a\": 1},");
        let err = JsonArraySource::open(file.path(), SourceOptions::new("x")).unwrap_err();
        assert!(matches!(err, PipelineError::ParseError(_)));
    }
}
