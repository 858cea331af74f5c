use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::error::GeminiError;
use super::types::{GenerateContentRequest, GenerateContentResponse};

pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Anything that can answer a `generateContent` request.
///
/// [`GeminiClient`] is the production implementation; tests substitute
/// scripted responders to exercise retry handling without a network.
#[allow(async_fn_in_trait)]
pub trait ContentGenerator {
    async fn generate_content(
        &self,
        req: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError>;
}

pub struct GeminiClient {
    api_key: String,
    model: String,
    client: Client,
    base_url: String,
}

impl GeminiClient {
    /// `base_url` is normally [`API_BASE_URL`]; tests point it at a mock server.
    pub fn with_base_url(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            model,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl ContentGenerator for GeminiClient {
    async fn generate_content(
        &self,
        req: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(req)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeminiError::RateLimited);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<GenerateContentResponse>().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::GenerationConfig;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::with_base_url(
            "test-key".into(),
            DEFAULT_MODEL.into(),
            server.uri(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request() -> GenerateContentRequest {
        GenerateContentRequest::single_turn(
            "Is this relevant?",
            GenerationConfig {
                temperature: 0.3,
                max_output_tokens: 50,
            },
        )
    }

    #[tokio::test]
    async fn posts_prompt_with_key_and_parses_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": {"maxOutputTokens": 50}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "{\"is_relevant\": true}"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server).generate_content(&request()).await.unwrap();
        assert_eq!(resp.first_text(), Some(r#"{"is_relevant": true}"#));
    }

    #[tokio::test]
    async fn maps_429_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate_content(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, GeminiError::RateLimited));
    }

    #[tokio::test]
    async fn maps_other_status_to_api_error_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate_content(&request())
            .await
            .unwrap_err();
        match err {
            GeminiError::ApiError { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad request");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreadable_body_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate_content(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, GeminiError::NetworkError(_)));
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = GeminiClient::with_base_url(
            "k".into(),
            "gemini-x".into(),
            "http://localhost:1234/".into(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-x:generateContent"
        );
    }
}
