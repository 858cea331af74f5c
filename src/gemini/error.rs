//! Error types for the Gemini `generateContent` transport.

use thiserror::Error;

/// Failures that can occur while talking to the Gemini API.
///
/// - [`RateLimited`](GeminiError::RateLimited): the server answered HTTP 429
/// - [`ApiError`](GeminiError::ApiError): any other non-success status
/// - [`NetworkError`](GeminiError::NetworkError): DNS, connect, timeout or body decode failure
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("rate limited (status 429)")]
    RateLimited,

    /// Carries the status code and the raw response body.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}
