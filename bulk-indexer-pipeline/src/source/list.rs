//! Plain list files: one value per line.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use super::{SourceItem, SourceOptions};
use crate::errors::PipelineError;
use bulk_indexer_shared::Document;

/// Lazily reads a list file, yielding one document per non-blank line.
///
/// The line text (trimmed) is stored in the configured field and, unless IDs
/// are generated by the engine, also used as the document ID so re-importing
/// the same lines replaces instead of duplicating.
#[derive(Debug)]
pub struct ListSource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    options: SourceOptions,
    line_number: usize,
    failed: bool,
}

impl ListSource {
    /// Open a list file for reading.
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
}

impl Iterator for ListSource {
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

            let value = line.trim();
            if value.is_empty() {
                continue;
            }

            let mut doc = Document::new(self.options.index.as_str())
                .with_field(self.options.list_field.as_str(), value);
            if !self.options.generate_ids {
                doc = doc.with_id(value);
            }

            return Some(Ok(doc));
        }
    }
}
