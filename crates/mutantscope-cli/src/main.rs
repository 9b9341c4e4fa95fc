//! MutantScope command-line entry point.

mod cli;
mod config;
mod pipeline;
mod repl;
mod report;
mod session;

use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays clean for reports.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,mutantscope=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!("MutantScope {}", env!("CARGO_PKG_VERSION"));
    cli::run().await
}
