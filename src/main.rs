mod classifier;
mod cli;
mod config;
mod error;
mod gemini;
mod listing;
mod pipeline;
mod records;
mod ui;

use anyhow::Result;
use clap::Parser;
use indicatif::MultiProgress;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::classifier::{RelevanceClassifier, is_candidate};
use crate::cli::{Cli, Command};
use crate::config::JobsiftConfig;
use crate::error::JobsiftError;
use crate::gemini::GeminiClient;
use crate::listing::ListingClient;
use crate::pipeline::FilterPipeline;
use crate::records::{JobRecord, load_records, save_records};
use crate::ui::{BatchProgress, LogWriter};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let multi = MultiProgress::new();
    init_tracing(cli.verbose, &multi);

    if let Err(e) = run(cli, &multi).await {
        error!("{e:#}");
        ui::print_failure(&e.to_string());
    }
}

fn init_tracing(verbose: bool, multi: &MultiProgress) {
    let writer = LogWriter::new(multi.clone());
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(move || writer.clone())
        .init();
}

async fn run(cli: Cli, multi: &MultiProgress) -> Result<()> {
    let mut config = JobsiftConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    match cli.command {
        Command::Fetch => {
            fetch(&config).await?;
        }
        Command::Filter => {
            let (api_key, records) = prepare_filter(&config)?;
            filter(&config, api_key, &records, multi).await?;
        }
        Command::Run => {
            let api_key = config.require_api_key()?;
            let records = fetch(&config).await?;
            filter(&config, api_key, &records, multi).await?;
        }
    }
    Ok(())
}

/// Setup for `filter`: the credential is checked before the input is opened.
fn prepare_filter(config: &JobsiftConfig) -> Result<(&str, Vec<JobRecord>), JobsiftError> {
    let api_key = config.require_api_key()?;
    let records = load_records(&config.jobs_file)?;
    Ok((api_key, records))
}

async fn fetch(config: &JobsiftConfig) -> Result<Vec<JobRecord>> {
    let client = ListingClient::new(
        config.listing_url.clone(),
        config.request_timeout(),
        config.listing_settings(),
    )?;
    let jobs = client.fetch_all().await;

    match save_records(&config.jobs_file, &jobs) {
        Ok(outcome) => ui::print_saved(&config.jobs_file, outcome, "jobs"),
        Err(e) => {
            error!(path = %config.jobs_file.display(), error = %e, "error saving fetched jobs");
            ui::print_failure(&format!("could not save fetched jobs: {e}"));
        }
    }
    Ok(jobs)
}

async fn filter(
    config: &JobsiftConfig,
    api_key: &str,
    records: &[JobRecord],
    multi: &MultiProgress,
) -> Result<()> {
    let client = GeminiClient::with_base_url(
        api_key.to_string(),
        config.model.clone(),
        config.api_base_url.clone(),
        config.request_timeout(),
    )?;
    let classifier = RelevanceClassifier::new(client, config.retry_policy());
    let settings = config.pipeline_settings();

    let budget = records
        .iter()
        .filter(|r| is_candidate(&r.title))
        .count()
        .min(settings.max_jobs);
    let pipeline = FilterPipeline::new(classifier, settings)
        .with_progress(BatchProgress::start(multi, budget));
    let relevant = pipeline.filter_jobs(records).await;

    match save_records(&config.filtered_file, &relevant) {
        Ok(outcome) => ui::print_saved(&config.filtered_file, outcome, "relevant jobs"),
        Err(e) => {
            error!(path = %config.filtered_file.display(), error = %e, "error saving filtered jobs");
            ui::print_failure(&format!("could not save filtered jobs: {e}"));
        }
    }
    info!(relevant = relevant.len(), "done");
    Ok(())
}
