//! Dependency initialization and wiring for the bulk indexer.

use std::sync::Arc;
use tracing::info;

use super::Settings;
use crate::{Cli, IndexingError, OutputLog};
use bulk_indexer_pipeline::Orchestrator;
use bulk_indexer_repository::OpenSearchClient;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Build the search client, output log and orchestrator.
    ///
    /// No request is sent here; the orchestrator checks liveness when the
    /// run starts.
    pub fn new(settings: &Settings, cli: &Cli) -> Result<Self, IndexingError> {
        let connection = settings.connection_config(cli.request_timeout());
        let engine_config = cli.engine_config();

        info!(
            url = %connection.url,
            timeout_secs = connection.request_timeout.as_secs(),
            batch_size = engine_config.batch_size,
            workers = engine_config.workers,
            "Initializing dependencies"
        );

        let search_client = OpenSearchClient::new(&connection)?;

        let output = OutputLog::open(cli.output.as_deref())?;

        let orchestrator =
            Orchestrator::new(Arc::new(search_client), engine_config, Arc::new(output));

        Ok(Self { orchestrator })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_wiring_does_not_connect() {
        let settings = Settings::from_yaml(
            "elasticsearch:\n  url: http://127.0.0.1:1\n  username: a\n  password: b\n",
        )
        .unwrap();
        let cli = Cli::try_parse_from(["bulk-indexer", "--config", "es.yaml", "--file", "x.txt"])
            .unwrap();

        assert!(Dependencies::new(&settings, &cli).is_ok());
    }

    #[test]
    fn test_unparseable_url_is_search_error() {
        let mut settings = Settings::from_yaml(
            "elasticsearch:\n  url: http://127.0.0.1:1\n  username: a\n  password: b\n",
        )
        .unwrap();
        settings.elasticsearch.url = "not a url".to_string();
        let cli = Cli::try_parse_from(["bulk-indexer", "--config", "es.yaml", "--file", "x.txt"])
            .unwrap();

        let err = Dependencies::new(&settings, &cli).err().unwrap();
        assert!(matches!(err, IndexingError::Search(_)));
    }

    #[test]
    fn test_unopenable_output_log_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::from_yaml(
            "elasticsearch:\n  url: http://127.0.0.1:1\n  username: a\n  password: b\n",
        )
        .unwrap();
        let output = dir.path().join("missing").join("import.log");
        let cli = Cli::try_parse_from([
            "bulk-indexer",
            "--config",
            "es.yaml",
            "--file",
            "x.txt",
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();

        let err = Dependencies::new(&settings, &cli).err().unwrap();
        assert!(matches!(err, IndexingError::IoError(_)));
    }
}
