//! Input format detection.
//!
//! Only the first line of a file is inspected. The result is a heuristic:
//! malformed content is reported by the document source, not here.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::errors::PipelineError;
use bulk_indexer_shared::FileFormat;

/// Classify the file at `path`.
pub fn classify_file(path: &Path) -> Result<FileFormat, PipelineError> {
    let file = File::open(path)
        .map_err(|e| PipelineError::read(format!("{}: {}", path.display(), e)))?;

    let format = classify(BufReader::new(file))
        .map_err(|e| PipelineError::read(format!("{}: {}", path.display(), e)))?;

    debug!(path = %path.display(), format = %format, "Classified input file");
    Ok(format)
}

/// Classify a stream from its first line.
///
/// * a first line holding a complete JSON object is `JsonLines`;
/// * a first line opening JSON that does not parse on its own, or a complete
///   one-line JSON array, is `Json`;
/// * anything else, including empty input, is `List`.
pub fn classify<R: BufRead>(mut reader: R) -> io::Result<FileFormat> {
    let mut raw = Vec::new();
    reader.read_until(b'\n', &mut raw)?;

    let line = String::from_utf8_lossy(&raw);
    let line = line.trim_start_matches('\u{feff}').trim();

    let format = match line.chars().next() {
        Some('{') | Some('[') => match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(_)) => FileFormat::JsonLines,
            // A complete array on one line, or a value spanning several lines
            _ => FileFormat::Json,
        },
        _ => FileFormat::List,
    };

    Ok(format)
}
