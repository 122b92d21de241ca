//! # flavor-extractor: package text extraction from the command line
//!
//! Thin entrypoint; all logic lives in the `flavor_extractor_cli` library crate.

use anyhow::Result;
use clap::Parser;
use flavor_extractor_cli::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load `.env` so clap can pick up OPENAI_* variables.
    dotenvy::dotenv().ok();

    // 2. Setup logging on stderr; stdout carries results.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("flavor_extractor=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 3. Parse CLI arguments
    let cli = Cli::parse();

    // 4. Run and report the final result
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
