//! Command line interface built on clap.
//!
//! Subcommands mirror the two halves of the tool (`fetch`, `filter`) plus
//! `run` for both. Global flags override values from `jobsift.toml`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::JobsiftConfig;

/// jobsift: fetch job postings and keep the ones worth applying to.
#[derive(Debug, Parser)]
#[command(name = "jobsift", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the config file (default: ./jobsift.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum number of titles sent to the classifier.
    #[arg(long, global = true)]
    pub max_jobs: Option<usize>,

    /// Attempts per title when the API rate-limits.
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// CSV of fetched jobs (written by `fetch`, read by `filter`).
    #[arg(long, global = true)]
    pub input: Option<PathBuf>,

    /// CSV the relevant jobs are written to.
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download postings from the job board into the jobs CSV.
    Fetch,

    /// Classify the jobs CSV and write the relevant postings.
    Filter,

    /// Fetch, then filter the freshly fetched postings.
    Run,
}

impl Cli {
    /// Applies command line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut JobsiftConfig) {
        if let Some(max_jobs) = self.max_jobs {
            config.max_jobs = max_jobs;
        }
        if let Some(max_retries) = self.max_retries {
            config.max_retries = max_retries;
        }
        if let Some(input) = &self.input {
            config.jobs_file = input.clone();
        }
        if let Some(output) = &self.output {
            config.filtered_file = output.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_subcommands() {
        assert!(matches!(Cli::parse_from(["jobsift", "fetch"]).command, Command::Fetch));
        assert!(matches!(Cli::parse_from(["jobsift", "filter"]).command, Command::Filter));
        assert!(matches!(Cli::parse_from(["jobsift", "run"]).command, Command::Run));
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "jobsift",
            "--max-jobs",
            "10",
            "--max-retries",
            "5",
            "--verbose",
            "filter",
            "--output",
            "out.csv",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.max_jobs, Some(10));
        assert_eq!(cli.max_retries, Some(5));
        assert_eq!(cli.output, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::parse_from(["jobsift", "--max-jobs", "7", "--input", "in.csv", "filter"]);
        let mut config = JobsiftConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.max_jobs, 7);
        assert_eq!(config.jobs_file, PathBuf::from("in.csv"));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.filtered_file, PathBuf::from("filtered_jobs.csv"));
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
