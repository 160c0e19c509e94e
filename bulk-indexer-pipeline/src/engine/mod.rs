//! Concurrent bulk-write engine.
//!
//! Documents are grouped into batches by a blocking producer task and pushed
//! through a bounded channel. The consuming side submits up to `workers`
//! batches at a time and flattens the per-document acknowledgments into a
//! single outcome stream.
//!
//! ```text
//! source ──► producer (spawn_blocking) ──► mpsc(queue_size) ──► buffer_unordered(workers) ──► outcomes
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, instrument, warn};

use crate::errors::PipelineError;
use bulk_indexer_repository::{BulkWriteClient, SearchError};
use bulk_indexer_shared::{BulkOutcome, Document};

/// Stream of per-document outcomes. An `Err` item is fatal to the file.
pub type OutcomeStream = BoxStream<'static, Result<BulkOutcome, PipelineError>>;

/// Configuration for the bulk-write engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of documents per bulk request.
    pub batch_size: usize,
    /// Maximum number of bulk requests in flight.
    pub workers: usize,
    /// Number of batches buffered between the producer and the workers.
    pub queue_size: usize,
    /// Maximum number of retry attempts for a batch after a transient failure.
    pub max_retries: u32,
    /// Initial retry delay in milliseconds.
    pub initial_retry_delay_ms: u64,
    /// Maximum retry delay in milliseconds.
    pub max_retry_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            workers: 4,
            queue_size: 4,
            max_retries: 3,
            initial_retry_delay_ms: 100,
            max_retry_delay_ms: 5000,
        }
    }
}

/// Messages sent from the producer to the submission side.
#[derive(Debug)]
enum BatchMessage {
    /// A full (or final partial) batch of documents.
    Documents(Vec<Document>),
    /// The source failed; nothing follows except `End`.
    Failed(PipelineError),
    /// The producer finished.
    End,
}

/// Submits documents through a `BulkWriteClient` with bounded concurrency.
///
/// The engine:
/// - Batches documents for efficient bulk requests
/// - Applies backpressure to the producer through a bounded queue
/// - Retries transient transport failures with exponential backoff
/// - Reports exactly one outcome per submitted document
pub struct BulkWriteEngine {
    client: Arc<dyn BulkWriteClient>,
    config: EngineConfig,
}

impl BulkWriteEngine {
    /// Create a new engine submitting through `client`.
    pub fn new(client: Arc<dyn BulkWriteClient>, config: EngineConfig) -> Self {
        Self { client, config }
    }

    /// Start submitting `source` and return the outcome stream.
    ///
    /// Must be called from within a Tokio runtime. Reading the source happens
    /// on the blocking thread pool and overlaps with submission. Dropping the
    /// returned stream cancels in-flight requests and stops the producer.
    ///
    /// Outcomes of different batches may arrive in any order. A document
    /// rejected by the engine yields a failed outcome; the stream goes on.
    /// A transport failure (after retries) or a source error stops further
    /// batches from being sent and ends the stream with a single `Err` item,
    /// after every batch already sent has reported its outcomes.
    #[instrument(skip(self, source), fields(batch_size = self.config.batch_size, workers = self.config.workers))]
    pub fn submit<S>(&self, source: S) -> OutcomeStream
    where
        S: IntoIterator<Item = Result<Document, PipelineError>> + Send + 'static,
        S::IntoIter: Send,
    {
        let batch_size = self.config.batch_size.max(1);
        let workers = self.config.workers.max(1);
        let (tx, rx) = mpsc::channel::<BatchMessage>(self.config.queue_size.max(1));

        tokio::task::spawn_blocking(move || produce_batches(source.into_iter(), batch_size, tx));

        let finished = Arc::new(AtomicBool::new(false));
        let seen_end = Arc::clone(&finished);

        let batches = ReceiverStream::new(rx).filter_map(move |message| {
            let item = match message {
                BatchMessage::Documents(documents) => Some(Ok(documents)),
                BatchMessage::Failed(e) => Some(Err(e)),
                BatchMessage::End => {
                    seen_end.store(true, Ordering::SeqCst);
                    None
                }
            };
            future::ready(item)
        });

        // The channel closing without `End` means the producer died (panic).
        let producer_check = stream::once(future::lazy(move |_| {
            if finished.load(Ordering::SeqCst) {
                None
            } else {
                Some(Err(PipelineError::channel(
                    "document producer stopped before reaching the end of its source",
                )))
            }
        }))
        .filter_map(future::ready);

        let client = Arc::clone(&self.client);
        let retry = RetryPolicy::from(&self.config);
        let aborted = Arc::new(AtomicBool::new(false));
        let stop_intake = Arc::clone(&aborted);

        let outcomes = batches
            .chain(producer_check)
            // After the first error no new batch is sent; queued ones are dropped
            .take_while(move |_| future::ready(!stop_intake.load(Ordering::SeqCst)))
            .map(move |batch| {
                let client = Arc::clone(&client);
                async move {
                    match batch {
                        Ok(documents) => submit_batch(client.as_ref(), documents, retry).await,
                        Err(e) => Err(e),
                    }
                }
            })
            .buffer_unordered(workers)
            .flat_map(|result| {
                let items: Vec<Result<BulkOutcome, PipelineError>> = match result {
                    Ok(outcomes) => outcomes.into_iter().map(Ok).collect(),
                    Err(e) => vec![Err(e)],
                };
                stream::iter(items)
            })
            .boxed()
            .fuse();

        // Hold the first error back until every in-flight batch has reported
        stream::unfold(
            (outcomes, None::<PipelineError>, aborted),
            |(mut outcomes, mut first_error, aborted)| async move {
                loop {
                    match outcomes.next().await {
                        Some(Ok(outcome)) => {
                            return Some((Ok(outcome), (outcomes, first_error, aborted)))
                        }
                        Some(Err(e)) => {
                            aborted.store(true, Ordering::SeqCst);
                            match first_error {
                                None => first_error = Some(e),
                                Some(_) => debug!(error = %e, "Dropping follow-up error"),
                            }
                        }
                        None => {
                            return first_error.take().map(|e| (Err(e), (outcomes, None, aborted)))
                        }
                    }
                }
            },
        )
        .boxed()
    }
}

/// Drain `documents` into batches on the calling (blocking) thread.
///
/// Blocks whenever the queue is full. Returns early once the receiving side
/// is gone.
fn produce_batches<I>(documents: I, batch_size: usize, tx: mpsc::Sender<BatchMessage>)
where
    I: Iterator<Item = Result<Document, PipelineError>>,
{
    let mut batch = Vec::with_capacity(batch_size);
    let mut produced = 0usize;

    for item in documents {
        match item {
            Ok(document) => {
                batch.push(document);
                produced += 1;
                if batch.len() >= batch_size {
                    let full = std::mem::replace(&mut batch, Vec::with_capacity(batch_size));
                    if tx.blocking_send(BatchMessage::Documents(full)).is_err() {
                        debug!(produced = produced, "Outcome stream dropped, stopping producer");
                        return;
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, produced = produced, "Document source failed");
                if !batch.is_empty() {
                    let partial = std::mem::take(&mut batch);
                    if tx.blocking_send(BatchMessage::Documents(partial)).is_err() {
                        return;
                    }
                }
                if tx.blocking_send(BatchMessage::Failed(e)).is_ok() {
                    let _ = tx.blocking_send(BatchMessage::End);
                }
                return;
            }
        }
    }

    if !batch.is_empty() && tx.blocking_send(BatchMessage::Documents(batch)).is_err() {
        return;
    }

    debug!(produced = produced, "Document source exhausted");
    let _ = tx.blocking_send(BatchMessage::End);
}

/// Backoff settings for resubmitting a batch after a transient failure.
#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl From<&EngineConfig> for RetryPolicy {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_retry_delay_ms),
            max_delay: Duration::from_millis(config.max_retry_delay_ms),
        }
    }
}

/// Submit one batch, retrying retryable transport failures.
///
/// A batch holding documents without an ID is only resent when the cluster
/// refused it outright; otherwise a resend could index them twice.
async fn submit_batch(
    client: &dyn BulkWriteClient,
    documents: Vec<Document>,
    retry: RetryPolicy,
) -> Result<Vec<BulkOutcome>, PipelineError> {
    let idempotent = documents.iter().all(|doc| doc.id().is_some());
    let mut delay = retry.initial_delay;
    let mut attempt = 0u32;

    loop {
        match client.bulk_write(&documents).await {
            Ok(outcomes) => {
                if attempt > 0 {
                    info!(
                        attempt = attempt,
                        count = documents.len(),
                        "Bulk request succeeded after retry"
                    );
                }
                return Ok(outcomes);
            }
            Err(e)
                if e.is_retryable()
                    && (idempotent || e.is_overload())
                    && attempt < retry.max_retries =>
            {
                attempt += 1;
                warn!(
                    attempt = attempt,
                    max_retries = retry.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Bulk request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(retry.max_delay);
            }
            Err(e) => return Err(transport_failure(e, documents.len())),
        }
    }
}

fn transport_failure(e: SearchError, count: usize) -> PipelineError {
    warn!(error = %e, count = count, "Bulk request failed");
    PipelineError::Search(e)
}
