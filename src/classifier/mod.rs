//! Relevance classification of job titles through the Gemini API.
//!
//! [`RelevanceClassifier`] owns the retry loop: HTTP 429 is retried with
//! exponential backoff plus jitter, every other failure is terminal. Whatever
//! happens, [`Classify::classify`] resolves to a plain `bool`; failures count
//! as "not relevant" so one bad call never stops a batch.

pub mod error;
pub mod parser;
pub mod prefilter;

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::gemini::{ContentGenerator, GenerateContentRequest, GenerationConfig};

pub use error::ClassifyError;
pub use parser::parse_verdict;
pub use prefilter::is_candidate;

/// Only a tiny JSON object is expected back.
pub const GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.3,
    max_output_tokens: 50,
};

/// Something that can decide whether a job title is relevant.
#[allow(async_fn_in_trait)]
pub trait Classify {
    async fn classify(&self, title: &str) -> bool;
}

/// Backoff settings for rate-limited requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero sends nothing.
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Upper bound of the random jitter added to each delay.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_jitter: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Deterministic part of the delay: `base_delay * 2^attempt` (zero-based attempt).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Backoff plus a uniform jitter in `[0, max_jitter]`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let jitter = if self.max_jitter.is_zero() {
            Duration::ZERO
        } else {
            let max = self.max_jitter.as_nanos() as u64;
            Duration::from_nanos(rand::rng().random_range(0..=max))
        };
        self.backoff(attempt) + jitter
    }
}

/// Builds the single-turn prompt sent for `title`.
pub fn build_prompt(title: &str) -> String {
    format!(
        "Given the job title '{title}', determine if it is suitable for a fresh BS Computer \
         Science graduate with expertise in Software Development, AI/ML, Deep Learning, and \
         Web Development. Include 'junior' or 'entry-level' roles. \
         Respond with JSON: {{\"is_relevant\": boolean}}"
    )
}

pub struct RelevanceClassifier<G> {
    generator: G,
    policy: RetryPolicy,
}

impl<G: ContentGenerator> RelevanceClassifier<G> {
    pub fn new(generator: G, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    /// Classifies `title`, surfacing the reason when no verdict could be obtained.
    pub async fn try_classify(&self, title: &str) -> Result<bool, ClassifyError> {
        let attempts = self.policy.max_retries;

        for attempt in 0..attempts {
            match self.request(title).await {
                Err(e) if e.is_retryable() => {
                    let delay = self.policy.delay_for_attempt(attempt);
                    warn!(
                        title,
                        attempt = attempt + 1,
                        max = attempts,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited, backing off"
                    );
                    sleep(delay).await;
                }
                other => return other,
            }
        }

        Err(ClassifyError::RetriesExhausted { attempts })
    }

    async fn request(&self, title: &str) -> Result<bool, ClassifyError> {
        let req = GenerateContentRequest::single_turn(build_prompt(title), GENERATION_CONFIG);
        let response = self.generator.generate_content(&req).await?;

        if response.candidates.is_empty() {
            return Err(ClassifyError::NoCandidates);
        }

        let text = response.first_text().unwrap_or_default();
        debug!(title, raw = text, "model response");
        Ok(parse_verdict(text))
    }
}

impl<G: ContentGenerator> Classify for RelevanceClassifier<G> {
    async fn classify(&self, title: &str) -> bool {
        info!(title, "evaluating job");
        match self.try_classify(title).await {
            Ok(verdict) => verdict,
            Err(e) => {
                error!(title, error = %e, "classification failed, treating as not relevant");
                false
            }
        }
    }
}
