mod batch;
mod clock;
mod config;
mod context;
mod errors;
mod llm_client;
mod pdf;
mod scoring;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::batch::BatchProcessor;
use crate::clock::TokioClock;
use crate::config::Config;
use crate::context::ProjectContext;
use crate::llm_client::LlmClient;
use crate::scoring::CandidateScorer;

/// Batch candidate scorer: reads a table of candidates, evaluates each one
/// against the position context, and writes an incrementally checkpointed,
/// score-sorted table.
#[derive(Debug, Parser)]
#[command(name = "scorer", version)]
struct Cli {
    /// Input candidate table.
    #[arg(long, env = "INPUT_CSV", default_value = "candidates/candidates.csv")]
    input: PathBuf,

    /// Output table, checkpointed after every candidate.
    #[arg(
        long,
        env = "OUTPUT_CSV",
        default_value = "candidates/candidates_scored.csv"
    )]
    output: PathBuf,

    /// Folder of position-context PDFs (job description, culture docs, ...).
    #[arg(long, env = "PROJECT_CONTEXT_DIR", default_value = "project_context")]
    context_dir: PathBuf,

    /// Directory holding the resume PDFs referenced from the table.
    #[arg(long, env = "CANDIDATES_DIR", default_value = "candidates")]
    candidates_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;
    let cli = Cli::parse();

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting candidate scorer v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let context = Arc::new(ProjectContext::new(cli.context_dir));
    let clock = Arc::new(TokioClock);
    let scorer = CandidateScorer::new(Arc::new(llm), context, clock.clone());

    let processor = BatchProcessor::new(scorer, cli.candidates_dir, clock);
    processor.run(&cli.input, &cli.output).await
}
