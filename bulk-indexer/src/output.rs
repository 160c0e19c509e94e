//! Progress output: stdout plus an optional append-only log file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use tracing::warn;

use crate::IndexingError;
use bulk_indexer_pipeline::ProgressReporter;

/// Echoes progress lines to stdout and appends them to a log file.
#[derive(Debug, Default)]
pub struct OutputLog {
    file: Option<Mutex<File>>,
}

impl OutputLog {
    /// Open the log at `path` in append mode, creating it if needed.
    /// With no path, lines only go to stdout.
    pub fn open(path: Option<&Path>) -> Result<Self, IndexingError> {
        let file = match path {
            Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
            None => None,
        };

        Ok(Self {
            file: file.map(Mutex::new),
        })
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        let mut file = file
            .lock()
            .map_err(|_| std::io::Error::other("output log lock poisoned"))?;
        writeln!(file, "{}", line)?;
        file.flush()
    }
}

impl ProgressReporter for OutputLog {
    fn report(&self, line: &str) {
        println!("{}", line);
        if let Err(e) = self.append(line) {
            warn!(error = %e, "Failed to write to output log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        let log = OutputLog::open(Some(path.as_path())).unwrap();
        log.report("[*] Connected to search engine");
        log.report("[!] Failed to index hosts/1: mapper_parsing_exception");
        drop(log);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "earlier run\n[*] Connected to search engine\n[!] Failed to index hosts/1: mapper_parsing_exception\n"
        );
    }

    #[test]
    fn test_stdout_only() {
        let log = OutputLog::open(None).unwrap();
        log.report("[*] Done");
        assert!(log.file.is_none());
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = OutputLog::open(Some(dir.path().join("missing").join("import.log").as_path()))
            .unwrap_err();
        assert!(matches!(err, IndexingError::IoError(_)));
    }
}
