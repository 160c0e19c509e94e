use std::env;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bulk_indexer::{report_failure, run, Cli};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(summary) => info!(summary = %summary, "Import finished"),
        Err(e) => {
            error!(error = %e, "Import failed");
            if let Err(write_err) = report_failure(&mut std::io::stdout(), &e) {
                error!(error = %write_err, "Failed to write to stdout");
            }
            std::process::exit(1);
        }
    }
}

/// Diagnostics go to stderr; stdout carries only progress and `[X]` lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}
