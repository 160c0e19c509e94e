//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use bulk_indexer_pipeline::source::DEFAULT_LIST_FIELD;
use bulk_indexer_pipeline::{EngineConfig, PlanInput};
use bulk_indexer_repository::config::DEFAULT_REQUEST_TIMEOUT;
use bulk_indexer_shared::FileFormat;

#[derive(Parser, Debug, Clone)]
#[command(name = "bulk-indexer")]
#[command(about = "Bulk-import list, JSON and JSON-Lines files into a search engine", long_about = None)]
pub struct Cli {
    /// File to be indexed
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Directory with files to be indexed (index names come from each file's path)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Type of the file to be indexed (list|json|jsonlines); detected when omitted
    #[arg(short = 't', long)]
    pub file_type: Option<FileFormat>,

    /// Name of the index; overrides the one in the config file
    #[arg(short, long)]
    pub index: Option<String>,

    /// Path to the config YAML file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Field name to use with list files
    #[arg(long, default_value = DEFAULT_LIST_FIELD)]
    pub field: String,

    /// Record field to use as the document ID for JSON files
    #[arg(long)]
    pub id_field: Option<String>,

    /// Let the search engine generate document IDs for list files
    #[arg(long)]
    pub elastic_id: bool,

    /// Derive the index name from the file path (e.g. subdomains.txt -> subdomains)
    #[arg(long)]
    pub auto_index: bool,

    /// Append progress lines to this file as well as stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Documents per bulk request
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Bulk requests in flight at once
    #[arg(long)]
    pub workers: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Run parameters for the ingest plan.
    pub fn plan_input(&self, config_index: Option<String>) -> PlanInput {
        PlanInput {
            file: self.file.clone(),
            dir: self.dir.clone(),
            format: self.file_type,
            index: self.index.clone(),
            config_index,
            auto_index: self.auto_index,
            list_field: self.field.clone(),
            id_field: self.id_field.clone(),
            generate_ids: self.elastic_id,
        }
    }

    /// Engine settings with command-line overrides applied.
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config
    }

    /// Per-request timeout, at least one second.
    pub fn request_timeout(&self) -> Duration {
        self.timeout_secs
            .map(|secs| Duration::from_secs(secs.max(1)))
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}
