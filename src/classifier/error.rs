use thiserror::Error;

use crate::gemini::GeminiError;

/// Ways a single classification can fail before yielding a verdict.
///
/// None of these escape [`RelevanceClassifier::classify`](super::RelevanceClassifier::classify);
/// each is folded into a negative verdict there.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The API answered without candidates (usually a blocked prompt).
    #[error("model returned no candidates")]
    NoCandidates,

    /// HTTP 429; the only retryable kind.
    #[error("rate limited")]
    RateLimited,

    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("rate limited on all {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

impl ClassifyError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClassifyError::RateLimited)
    }
}

impl From<GeminiError> for ClassifyError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::RateLimited => ClassifyError::RateLimited,
            GeminiError::ApiError { status, message } => ClassifyError::Http { status, message },
            GeminiError::NetworkError(e) => ClassifyError::Network(e),
        }
    }
}
