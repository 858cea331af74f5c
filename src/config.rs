//! jobsift configuration loaded from `jobsift.toml`.
//!
//! Every field has a default, so the file is optional. `GEMINI_API_KEY`
//! (from the environment or a `.env` file) takes precedence over the
//! `api_key` in the file. The config is turned into the settings structs each
//! component takes, so nothing reads global state after startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::classifier::RetryPolicy;
use crate::error::JobsiftError;
use crate::gemini::client::{API_BASE_URL, DEFAULT_MODEL};
use crate::listing::{LISTING_URL, ListingSettings};
use crate::pipeline::PipelineSettings;

pub const CONFIG_FILE: &str = "jobsift.toml";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level configuration loaded from `jobsift.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobsiftConfig {
    /// Gemini API key; `GEMINI_API_KEY` overrides it.
    #[serde(default)]
    pub api_key: String,

    /// Gemini model used for classification.
    #[serde(default = "default_model")]
    pub model: String,

    /// Scheme and host of the Gemini API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Attempts per title when rate limited; 0 sends no request at all.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base of the exponential backoff; attempt `n` waits `base * 2^n`.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound of the random jitter added to each backoff, in milliseconds.
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,

    /// Per-request HTTP timeout for both APIs.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Pause after every classification call.
    #[serde(default = "default_inter_call_delay_ms")]
    pub inter_call_delay_ms: u64,

    /// Classification calls allowed per batch.
    #[serde(default = "default_max_jobs")]
    pub max_jobs: usize,

    /// Job board endpoint; pages are requested with `?page=N`.
    #[serde(default = "default_listing_url")]
    pub listing_url: String,

    /// Last page fetched from the job board.
    #[serde(default = "default_listing_max_pages")]
    pub listing_max_pages: u32,

    /// Pause between page fetches.
    #[serde(default = "default_listing_page_delay_ms")]
    pub listing_page_delay_ms: u64,

    /// CSV written by `fetch` and read by `filter`.
    #[serde(default = "default_jobs_file")]
    pub jobs_file: PathBuf,

    /// CSV of relevant jobs; not created when nothing is relevant.
    #[serde(default = "default_filtered_file")]
    pub filtered_file: PathBuf,
}

// Default model: "gemini-2.0-flash".
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

// Default API host: the public Gemini endpoint.
fn default_api_base_url() -> String {
    API_BASE_URL.to_string()
}

// Default attempts per title: 3.
fn default_max_retries() -> u32 {
    3
}

// Default backoff base: 1000ms.
fn default_base_delay_ms() -> u64 {
    1000
}

// Default jitter bound: 100ms.
fn default_max_jitter_ms() -> u64 {
    100
}

// Default request timeout: 10s.
fn default_request_timeout_secs() -> u64 {
    10
}

// Default spacing between classification calls: 5000ms.
fn default_inter_call_delay_ms() -> u64 {
    5000
}

// Default batch size: 50 classified titles.
fn default_max_jobs() -> usize {
    50
}

// Default job board: Arbeitnow.
fn default_listing_url() -> String {
    LISTING_URL.to_string()
}

// Default page ceiling: 3.
fn default_listing_max_pages() -> u32 {
    3
}

// Default pause between pages: 1000ms.
fn default_listing_page_delay_ms() -> u64 {
    1000
}

// Default fetched-jobs file: jobs.csv.
fn default_jobs_file() -> PathBuf {
    PathBuf::from("jobs.csv")
}

// Default result file: filtered_jobs.csv.
fn default_filtered_file() -> PathBuf {
    PathBuf::from("filtered_jobs.csv")
}

impl Default for JobsiftConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            api_base_url: default_api_base_url(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_jitter_ms: default_max_jitter_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            inter_call_delay_ms: default_inter_call_delay_ms(),
            max_jobs: default_max_jobs(),
            listing_url: default_listing_url(),
            listing_max_pages: default_listing_max_pages(),
            listing_page_delay_ms: default_listing_page_delay_ms(),
            jobs_file: default_jobs_file(),
            filtered_file: default_filtered_file(),
        }
    }
}

impl JobsiftConfig {
    /// Loads `path` (or `jobsift.toml` in the working directory), then applies `GEMINI_API_KEY`.
    pub fn load(path: Option<&Path>) -> Result<Self, JobsiftError> {
        let env_key = std::env::var(API_KEY_ENV).ok();
        Self::load_with_key(path.unwrap_or(Path::new(CONFIG_FILE)), env_key)
    }

    fn load_with_key(path: &Path, env_key: Option<String>) -> Result<Self, JobsiftError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<JobsiftConfig>(&contents)?
        } else {
            Self::default()
        };

        if let Some(key) = env_key
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }

    /// The API key, or [`JobsiftError::MissingCredential`] when none was configured.
    pub fn require_api_key(&self) -> Result<&str, JobsiftError> {
        if self.api_key.trim().is_empty() {
            return Err(JobsiftError::MissingCredential(API_KEY_ENV));
        }
        Ok(&self.api_key)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_jitter: Duration::from_millis(self.max_jitter_ms),
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            max_jobs: self.max_jobs,
            inter_call_delay: Duration::from_millis(self.inter_call_delay_ms),
        }
    }

    pub fn listing_settings(&self) -> ListingSettings {
        ListingSettings {
            max_pages: self.listing_max_pages,
            page_delay: Duration::from_millis(self.listing_page_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = JobsiftConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.max_jobs, 50);
        assert_eq!(config.inter_call_delay_ms, 5000);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.jobs_file, PathBuf::from("jobs.csv"));
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn default_settings_match_component_defaults() {
        let config = JobsiftConfig::default();
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.pipeline_settings().max_jobs, PipelineSettings::default().max_jobs);
        assert_eq!(
            config.pipeline_settings().inter_call_delay,
            Duration::from_secs(5)
        );
        assert_eq!(config.listing_settings().max_pages, 3);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_key = "file-key"
            max_jobs = 10
            filtered_file = "out/relevant.csv"
        "#;
        let config: JobsiftConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.max_jobs, 10);
        assert_eq!(config.filtered_file, PathBuf::from("out/relevant.csv"));
        assert_eq!(config.base_delay_ms, 1000);
    }

    #[test]
    fn zero_retries_reaches_the_retry_policy() {
        let config: JobsiftConfig = toml::from_str("max_retries = 0\nmax_jitter_ms = 0\n").unwrap();
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 0);
        assert!(policy.max_jitter.is_zero());
        assert_eq!(policy.base_delay, Duration::from_secs(1));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config =
            JobsiftConfig::load_with_key(&dir.path().join("jobsift.toml"), None).unwrap();
        assert_eq!(config.max_retries, 3);
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn env_key_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobsift.toml");
        std::fs::write(&path, "api_key = \"file-key\"\n").unwrap();

        let config = JobsiftConfig::load_with_key(&path, Some("env-key".into())).unwrap();
        assert_eq!(config.require_api_key().unwrap(), "env-key");

        let config = JobsiftConfig::load_with_key(&path, Some(String::new())).unwrap();
        assert_eq!(config.require_api_key().unwrap(), "file-key");
    }

    #[test]
    fn blank_key_is_missing_credential() {
        let config = JobsiftConfig {
            api_key: "   ".into(),
            ..JobsiftConfig::default()
        };
        assert!(matches!(
            config.require_api_key(),
            Err(JobsiftError::MissingCredential("GEMINI_API_KEY"))
        ));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobsift.toml");
        std::fs::write(&path, "max_jobs = \"many\"\n").unwrap();
        assert!(matches!(
            JobsiftConfig::load_with_key(&path, None),
            Err(JobsiftError::Toml(_))
        ));
    }
}
