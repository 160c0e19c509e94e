//! Orchestrator module for the ingestion pipeline.
//!
//! Drives every file of a plan through classification, index resolution,
//! document production and bulk submission, one file at a time.

mod job;
mod plan;
mod reporter;

pub use job::IngestionJob;
pub use plan::{IngestPlan, PlanInput};
pub use reporter::ProgressReporter;

use std::fmt;
use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, error, info, instrument, warn};

use crate::engine::{BulkWriteEngine, EngineConfig};
use crate::errors::PipelineError;
use crate::source::{DocumentSource, SourceOptions};
use bulk_indexer_repository::BulkWriteClient;
use bulk_indexer_shared::FileFormat;

/// Totals of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_total: usize,
    pub files_imported: usize,
    pub files_failed: usize,
    pub documents_indexed: usize,
    pub documents_rejected: usize,
}

impl RunSummary {
    /// Whether every file was imported. Rejected documents do not count.
    pub fn is_success(&self) -> bool {
        self.files_failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} files imported, {} documents indexed, {} rejected",
            self.files_imported, self.files_total, self.documents_indexed, self.documents_rejected
        )
    }
}

/// Counts for the file currently being ingested.
#[derive(Debug, Default)]
struct FileStats {
    indexed: usize,
    rejected: usize,
}

/// Orchestrator that coordinates the pipeline components.
///
/// The orchestrator:
/// - Confirms the search engine is reachable before touching any file
/// - Ingests files sequentially, in plan order
/// - Reports per-document rejections and per-file results
/// - Keeps going after a file fails and records it in the summary
pub struct Orchestrator {
    client: Arc<dyn BulkWriteClient>,
    engine: BulkWriteEngine,
    reporter: Arc<dyn ProgressReporter>,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(
        client: Arc<dyn BulkWriteClient>,
        engine_config: EngineConfig,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        let engine = BulkWriteEngine::new(Arc::clone(&client), engine_config);
        Self {
            client,
            engine,
            reporter,
        }
    }

    /// Run every file of `plan`.
    ///
    /// Returns `Err` only when the run cannot start. Failed files are
    /// reported and counted; check [`RunSummary::is_success`].
    #[instrument(skip(self, plan), fields(files = plan.files().len()))]
    pub async fn run(&self, plan: &IngestPlan) -> Result<RunSummary, PipelineError> {
        info!("Starting ingestion run");

        self.check_connection().await?;
        self.reporter.report("[*] Connected to search engine");

        let mut summary = RunSummary {
            files_total: plan.files().len(),
            ..RunSummary::default()
        };

        for path in plan.files() {
            let mut stats = FileStats::default();
            let result = self.ingest_file(plan.job_for(path), &mut stats).await;

            summary.documents_indexed += stats.indexed;
            summary.documents_rejected += stats.rejected;

            match result {
                Ok(index) => {
                    summary.files_imported += 1;
                    info!(
                        path = %path.display(),
                        index = %index,
                        indexed = stats.indexed,
                        rejected = stats.rejected,
                        "File imported"
                    );
                    self.reporter.report(&format!(
                        "[*] Successfully imported {} into {} ({} indexed, {} failed)",
                        path.display(),
                        index,
                        stats.indexed,
                        stats.rejected
                    ));
                }
                Err(e) => {
                    summary.files_failed += 1;
                    error!(path = %path.display(), error = %e, "File import failed");
                    self.reporter.report(&format!(
                        "[X] Failed to import {}: {}",
                        path.display(),
                        e
                    ));
                }
            }
        }

        info!(
            imported = summary.files_imported,
            failed = summary.files_failed,
            indexed = summary.documents_indexed,
            rejected = summary.documents_rejected,
            "Ingestion run complete"
        );
        self.reporter.report(&format!("[*] Done: {}", summary));

        Ok(summary)
    }

    async fn check_connection(&self) -> Result<(), PipelineError> {
        match self.client.ping().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(PipelineError::connection(
                "search engine did not answer the liveness check",
            )),
            Err(e) => Err(PipelineError::connection(e.to_string())),
        }
    }

    /// Ingest one file. Returns the index it went to.
    #[instrument(skip(self, job, stats), fields(path = %job.path().display()))]
    async fn ingest_file(
        &self,
        job: IngestionJob,
        stats: &mut FileStats,
    ) -> Result<String, PipelineError> {
        let path = job.path().to_path_buf();
        let (format, options) = run_blocking(move || prepare_job(job)).await?;
        let index = options.index.clone();

        self.reporter.report(&format!(
            "[*] Importing {} into the {} index as a {} file",
            path.display(),
            index,
            format
        ));

        let source = run_blocking(move || DocumentSource::open(&path, format, options)).await?;
        debug!(index = %index, format = %format, streamed = source.is_streamed(), "Opened source");

        let mut outcomes = self.engine.submit(source);

        while let Some(item) = outcomes.next().await {
            // An error is the last item, after in-flight batches have reported
            let outcome = item?;

            if outcome.is_success() {
                stats.indexed += 1;
            } else {
                stats.rejected += 1;
                let detail = outcome.error().unwrap_or_default();
                warn!(document = %outcome, status = ?outcome.status(), error = %detail, "Document rejected");
                self.reporter
                    .report(&format!("[!] Failed to index {}: {}", outcome, detail));
            }
        }

        Ok(index)
    }
}

/// Resolve format and index of a job. May read the file.
fn prepare_job(mut job: IngestionJob) -> Result<(FileFormat, SourceOptions), PipelineError> {
    let format = job.resolve_format()?;
    let options = job.source_options()?;
    Ok((format, options))
}

/// Run file work on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PipelineError::channel(format!("file task failed: {}", e)))?
}
