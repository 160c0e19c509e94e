//! JSON-Lines files: one JSON object per line.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{document_from_record, SourceItem, SourceOptions};
use crate::errors::PipelineError;

/// Lazily reads a JSON-Lines file, yielding one document per object line.
///
/// Blank lines are skipped. The first unreadable or unparsable line ends the
/// iteration with an error.
#[derive(Debug)]
pub struct JsonLinesSource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    options: SourceOptions,
    line_number: usize,
    failed: bool,
}

impl JsonLinesSource {
    /// Open a JSON-Lines file for reading.
    pub fn open(path: &Path, options: SourceOptions) -> Result<Self, PipelineError> {
        let file = File::open(path)
            .map_err(|e| PipelineError::read(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
            options,
            line_number: 0,
            failed: false,
        })
    }

    fn parse_line(&self, line: &str) -> SourceItem {
        let location = format!("{} line {}", self.path.display(), self.line_number);

        let record = match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(record)) => record,
            Ok(_) => {
                return Err(PipelineError::parse(format!(
                    "{}: expected a JSON object",
                    location
                )))
            }
            Err(e) => return Err(PipelineError::parse(format!("{}: {}", location, e))),
        };

        document_from_record(record, &self.options, &location)
    }
}

impl Iterator for JsonLinesSource {
    type Item = SourceItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(PipelineError::read(format!(
                        "{} line {}: {}",
                        self.path.display(),
                        self.line_number + 1,
                        e
                    ))));
                }
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            let item = self.parse_line(&line);
            self.failed = item.is_err();
            return Some(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulk_indexer_shared::Document;
    use serde_json::json;
    use std::io::Write;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_id_field_round_trip() {
        let file = write_file(concat!(
            "{\"_id\": \"one\", \"host\": \"a.example.com\", \"ports\": [80, 443]}\n",
            "{\"_id\": \"two\", \"host\": \"b.example.com\", \"meta\": {\"cdn\": true}}\n",
        ));
        let mut options = SourceOptions::new("httpx");
        options.id_field = Some("_id".to_string());

        let docs: Vec<Document> = JsonLinesSource::open(file.path(), options)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id(), Some("one"));
        assert_eq!(docs[0].index(), "httpx");
        assert_eq!(docs[0].get("host"), Some(&json!("a.example.com")));
        assert_eq!(docs[0].get("ports"), Some(&json!([80, 443])));
        assert_eq!(docs[1].id(), Some("two"));
        assert_eq!(docs[1].get("meta"), Some(&json!({"cdn": true})));
        assert_eq!(docs[1].fields().len(), 2);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let file = write_file("{\"a\": 1}\n\n   \n{\"a\": 2}\n");

        let docs: Vec<Document> = JsonLinesSource::open(file.path(), SourceOptions::new("x"))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.id().is_none()));
    }

    #[test]
    fn test_missing_id_field_stops_iteration() {
        let file = write_file("{\"uuid\": \"1\"}\n{\"other\": 2}\n{\"uuid\": \"3\"}\n");
        let mut options = SourceOptions::new("x");
        options.id_field = Some("uuid".to_string());

        let items: Vec<SourceItem> = JsonLinesSource::open(file.path(), options)
            .unwrap()
            .collect();

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        let err = items[1].as_ref().unwrap_err();
        assert!(matches!(err, PipelineError::MissingIdField(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_malformed_line_is_parse_error() {
        let file = write_file("{\"a\": 1}\n{\"a\": \n");

        let items: Vec<SourceItem> = JsonLinesSource::open(file.path(), SourceOptions::new("x"))
            .unwrap()
            .collect();

        assert_eq!(items.len(), 2);
        assert!(matches!(items[1], Err(PipelineError::ParseError(_))));
    }

    #[test]
    fn test_non_object_line_is_parse_error() {
        let file = write_file("[1, 2, 3]\n");

        let items: Vec<SourceItem> = JsonLinesSource::open(file.path(), SourceOptions::new("x"))
            .unwrap()
            .collect();

        assert!(matches!(items[0], Err(PipelineError::ParseError(_))));
    }
}
