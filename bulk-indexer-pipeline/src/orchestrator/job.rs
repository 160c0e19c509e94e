//! Per-file ingestion job.

use std::path::{Path, PathBuf};

use crate::errors::PipelineError;
use crate::format::classify_file;
use crate::resolver::resolve_index_name;
use crate::source::{SourceOptions, DEFAULT_LIST_FIELD};
use bulk_indexer_shared::FileFormat;

/// Everything needed to ingest one input file.
///
/// Format and index may be left unset; they are resolved on first use and
/// cached. Nothing else changes once the job is built.
#[derive(Debug, Clone)]
pub struct IngestionJob {
    path: PathBuf,
    format: Option<FileFormat>,
    index: Option<String>,
    list_field: String,
    id_field: Option<String>,
    auto_index: bool,
    generate_ids: bool,
}

impl IngestionJob {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            index: None,
            list_field: DEFAULT_LIST_FIELD.to_string(),
            id_field: None,
            auto_index: false,
            generate_ids: false,
        }
    }

    pub fn with_format(mut self, format: Option<FileFormat>) -> Self {
        self.format = format;
        self
    }

    pub fn with_index(mut self, index: Option<String>) -> Self {
        self.index = index;
        self
    }

    pub fn with_list_field(mut self, field: impl Into<String>) -> Self {
        self.list_field = field.into();
        self
    }

    pub fn with_id_field(mut self, field: Option<String>) -> Self {
        self.id_field = field;
        self
    }

    pub fn with_auto_index(mut self, auto_index: bool) -> Self {
        self.auto_index = auto_index;
        self
    }

    pub fn with_generated_ids(mut self, generate_ids: bool) -> Self {
        self.generate_ids = generate_ids;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file format, classifying the file if none was given.
    pub fn resolve_format(&mut self) -> Result<FileFormat, PipelineError> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        let format = classify_file(&self.path)?;
        self.format = Some(format);
        Ok(format)
    }

    /// The target index, derived from the path if none was given.
    pub fn resolve_index(&mut self) -> Result<&str, PipelineError> {
        let index = match self.index.take() {
            Some(index) => index,
            None if self.auto_index => resolve_index_name(&self.path),
            None => {
                return Err(PipelineError::resolution(format!(
                    "No index given for {} and automatic index naming is disabled",
                    self.path.display()
                )))
            }
        };
        Ok(self.index.insert(index).as_str())
    }

    /// Source options for this job. Resolves the index first.
    pub fn source_options(&mut self) -> Result<SourceOptions, PipelineError> {
        let mut options = SourceOptions::new(self.resolve_index()?);
        options.list_field = self.list_field.clone();
        options.id_field = self.id_field.clone();
        options.generate_ids = self.generate_ids;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_given_values_are_kept() {
        let mut job = IngestionJob::new("/nowhere/in/httpx-1/out.json")
            .with_format(Some(FileFormat::JsonLines))
            .with_index(Some("fixed".to_string()))
            .with_auto_index(true);

        // No file access happens when both are given
        assert_eq!(job.resolve_format().unwrap(), FileFormat::JsonLines);
        assert_eq!(job.resolve_index().unwrap(), "fixed");
    }

    #[test]
    fn test_index_from_path() {
        let mut job = IngestionJob::new("/data/in/nuclei-2/output.txt").with_auto_index(true);
        assert_eq!(job.resolve_index().unwrap(), "nuclei");
    }

    #[test]
    fn test_missing_index_without_auto_index() {
        let mut job = IngestionJob::new("/data/output.txt");
        assert!(matches!(
            job.resolve_index(),
            Err(PipelineError::ResolutionError(_))
        ));
    }

    #[test]
    fn test_format_is_classified_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"a\": 1}}").unwrap();
        let mut job = IngestionJob::new(file.path());

        assert_eq!(job.resolve_format().unwrap(), FileFormat::JsonLines);

        // Rewriting the file does not change the cached answer
        file.as_file().set_len(0).unwrap();
        assert_eq!(job.resolve_format().unwrap(), FileFormat::JsonLines);
    }

    #[test]
    fn test_source_options() {
        let mut job = IngestionJob::new("in/subfinder-1/domains.txt")
            .with_auto_index(true)
            .with_list_field("domain")
            .with_id_field(Some("uuid".to_string()))
            .with_generated_ids(true);

        let options = job.source_options().unwrap();
        assert_eq!(options.index, "subfinder");
        assert_eq!(options.list_field, "domain");
        assert_eq!(options.id_field.as_deref(), Some("uuid"));
        assert!(options.generate_ids);
    }
}
