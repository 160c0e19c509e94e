//! Document sources.
//!
//! A source turns one input file into normalized documents. The list and
//! JSON-Lines variants read the file incrementally and yield documents
//! lazily; they are single-pass and cannot be restarted. The JSON array
//! variant has to parse the whole file up front and holds every document in
//! memory before the first one is submitted.

mod json_array;
mod jsonlines;
mod list;

pub use json_array::JsonArraySource;
pub use jsonlines::JsonLinesSource;
pub use list::ListSource;

use std::path::Path;

use serde_json::{Map, Value};

use crate::errors::PipelineError;
use bulk_indexer_shared::{Document, FileFormat};

/// Reserved bulk metadata keys stripped from record bodies.
const ID_KEY: &str = "_id";
const INDEX_KEY: &str = "_index";

/// Field name used for list files when none is configured.
pub const DEFAULT_LIST_FIELD: &str = "value";

/// Item produced by every source.
pub type SourceItem = Result<Document, PipelineError>;

/// Iterator type produced by [`DocumentSource::into_iter`].
pub type SourceIter = Box<dyn Iterator<Item = SourceItem> + Send>;

/// How records of one file become documents.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Index every document is routed to.
    pub index: String,
    /// Field that holds the line text of list files.
    pub list_field: String,
    /// Record field whose value becomes the document ID (JSON formats).
    pub id_field: Option<String>,
    /// Leave list documents without an ID so the engine generates one.
    pub generate_ids: bool,
}

impl SourceOptions {
    /// Options routing to `index` with the defaults for everything else.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            list_field: DEFAULT_LIST_FIELD.to_string(),
            id_field: None,
            generate_ids: false,
        }
    }
}

/// Documents of one input file, by format.
#[derive(Debug)]
pub enum DocumentSource {
    /// Streamed, one document per non-blank line.
    List(ListSource),
    /// Streamed, one document per JSON object line.
    JsonLines(JsonLinesSource),
    /// Fully materialized from a single JSON array.
    JsonArray(JsonArraySource),
}

impl DocumentSource {
    /// Open `path` as a source of the given format.
    ///
    /// For [`FileFormat::Json`] this parses the whole file, so structural
    /// errors and missing ID fields are reported here rather than during
    /// iteration.
    pub fn open(
        path: &Path,
        format: FileFormat,
        options: SourceOptions,
    ) -> Result<Self, PipelineError> {
        Ok(match format {
            FileFormat::List => Self::List(ListSource::open(path, options)?),
            FileFormat::JsonLines => Self::JsonLines(JsonLinesSource::open(path, options)?),
            FileFormat::Json => Self::JsonArray(JsonArraySource::open(path, options)?),
        })
    }

    /// Whether documents are produced while the file is being read.
    pub fn is_streamed(&self) -> bool {
        !matches!(self, Self::JsonArray(_))
    }
}

impl IntoIterator for DocumentSource {
    type Item = SourceItem;
    type IntoIter = SourceIter;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Self::List(source) => Box::new(source),
            Self::JsonLines(source) => Box::new(source),
            Self::JsonArray(source) => Box::new(source.into_documents().into_iter().map(Ok)),
        }
    }
}

/// Build a document from a parsed JSON record.
///
/// `_id` and `_index` are removed from the body. The ID comes from
/// `id_field` when configured (which must then be present), otherwise from
/// the record's own `_id` key if it had one.
pub(crate) fn document_from_record(
    mut record: Map<String, Value>,
    options: &SourceOptions,
    location: &str,
) -> Result<Document, PipelineError> {
    let meta_id = record.remove(ID_KEY);
    record.remove(INDEX_KEY);

    let id_value = match options.id_field.as_deref() {
        Some(ID_KEY) => Some(meta_id.ok_or_else(|| missing_id(ID_KEY, location))?),
        Some(field) => Some(
            record
                .get(field)
                .cloned()
                .ok_or_else(|| missing_id(field, location))?,
        ),
        None => meta_id,
    };

    let document = Document::with_fields(options.index.clone(), record);
    match id_value {
        Some(value) => Ok(document.with_id(id_to_string(value, location)?)),
        None => Ok(document),
    }
}

fn missing_id(field: &str, location: &str) -> PipelineError {
    PipelineError::missing_id_field(format!("field '{}' not found in {}", field, location))
}

fn id_to_string(value: Value, location: &str) -> Result<String, PipelineError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(PipelineError::invalid_id(format!(
            "{} cannot be used as a document ID in {}",
            other, location
        ))),
    }
}
