//! # Bulk Indexer
//!
//! Entry point and configuration for importing local result files into a
//! search engine.
//!
//! This crate wires the settings file and command line into the ingestion
//! pipeline and reports progress to stdout and an optional log file.

pub mod cli;
pub mod config;
pub mod output;

pub use cli::Cli;
pub use config::{Dependencies, Settings};
pub use output::OutputLog;

use std::io::Write;

use bulk_indexer_pipeline::{IngestPlan, RunSummary};
use thiserror::Error;
use tracing::info;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error(transparent)]
    Pipeline(#[from] bulk_indexer_pipeline::PipelineError),

    /// Search error.
    #[error(transparent)]
    Search(#[from] bulk_indexer_repository::SearchError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The run finished but some files could not be imported.
    #[error("{0} file(s) could not be imported")]
    Incomplete(usize),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Run one import as described by `cli`.
///
/// Settings and the run plan are validated before the search engine is
/// contacted.
pub async fn run(cli: Cli) -> Result<RunSummary, IndexingError> {
    let settings = Settings::load(&cli.config)?;
    let plan = IngestPlan::new(cli.plan_input(settings.index.clone()))?;

    info!(files = plan.files().len(), "Run plan ready");

    let dependencies = Dependencies::new(&settings, &cli)?;
    let summary = dependencies.orchestrator.run(&plan).await?;

    if summary.is_success() {
        Ok(summary)
    } else {
        Err(IndexingError::Incomplete(summary.files_failed))
    }
}

/// Write the `[X]` line for a run that ended in `err`.
///
/// It goes to the same stream as the progress lines.
pub fn report_failure(out: &mut impl Write, err: &IndexingError) -> std::io::Result<()> {
    writeln!(out, "[X] {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_line() {
        let mut out = Vec::new();
        report_failure(&mut out, &IndexingError::Incomplete(2)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[X] 2 file(s) could not be imported\n"
        );
    }

    #[test]
    fn test_search_error_keeps_its_message() {
        let err: IndexingError =
            bulk_indexer_repository::SearchError::connection("connection refused").into();
        let mut out = Vec::new();
        report_failure(&mut out, &err).unwrap();

        assert!(matches!(err, IndexingError::Search(_)));
        assert!(String::from_utf8(out).unwrap().contains("connection refused"));
    }
}
