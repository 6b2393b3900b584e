//! casewright - batch test-case generation entry point.
//!
//! Reads a JSON batch file (an array of case requests), runs the
//! generation pipeline against the configured model service, and writes
//! the resulting spec files plus a suite summary into the output
//! directory.

use anyhow::Context;
use casewright::{casegen::CaseRequest, CaseGenerator, Config, OpenAiClient};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "casewright=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        model = %config.model_name,
        output_dir = %config.output_dir.display(),
        "loaded configuration"
    );

    // Read the batch file
    let cases_path = std::env::args()
        .nth(1)
        .context("usage: casewright <cases.json>")?;
    let raw = std::fs::read_to_string(&cases_path)
        .with_context(|| format!("could not read batch file {}", cases_path))?;
    let cases: Vec<CaseRequest> = serde_json::from_str(&raw)
        .with_context(|| format!("batch file {} is not a valid case list", cases_path))?;

    // Run the pipeline
    let gateway = OpenAiClient::new(&config);
    let mut generator = CaseGenerator::new(gateway, &config)?;
    let batch = generator.generate_batch(&cases).await?;

    for outcome in &batch.results {
        match (&outcome.filename, &outcome.error) {
            (Some(filename), _) => {
                info!(case = %outcome.config.name, %filename, "case generated")
            }
            (None, Some(message)) => {
                error!(case = %outcome.config.name, error = %message, "case failed")
            }
            (None, None) => {}
        }
    }
    info!(
        total = batch.total_cases,
        succeeded = batch.successful_count,
        failed = batch.failed_count,
        summary = %batch.summary_filename,
        "batch complete"
    );

    Ok(())
}
