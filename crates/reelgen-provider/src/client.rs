// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the image-to-video completion endpoint.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::StreamExt;
use reelgen_config::ApiConfig;
use reelgen_core::{
    Backoff, ExtractedMedia, GenerationRequest, ReelgenError, RetryPolicy, VideoProvider,
};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderValue};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::extractor::ResponseExtractor;
use crate::image::to_data_uri;
use crate::types::{ApiErrorResponse, ChatRequest};

/// Longest slice of an error body carried into an error message.
const ERROR_SNIPPET_CHARS: usize = 400;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a reachability probe against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub status: u16,
    pub latency: Duration,
}

impl ProbeReport {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends generation requests and extracts the video URL from the response.
#[derive(Debug, Clone)]
pub struct RequestClient {
    http: reqwest::Client,
    api: ApiConfig,
    policy: RetryPolicy,
}

impl RequestClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ReelgenError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ReelgenError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api: config.clone(),
            policy: RetryPolicy {
                max_attempts: config.max_retry_attempts,
                backoff: Backoff::new(
                    Duration::from_millis(config.retry_backoff_ms),
                    Duration::from_millis(config.retry_backoff_max_ms),
                ),
                timeout: config.timeout(),
            },
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.api.server_url = url;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn api_key(&self) -> Result<&str, ReelgenError> {
        self.api
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ReelgenError::Config("api.api_key is not set".into()))
    }

    /// Generates a video for `request` and returns its URL.
    ///
    /// A missing image or API key fails before any network traffic.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<ExtractedMedia, ReelgenError> {
        let image = request.image_bytes().ok_or(ReelgenError::MissingImage)?;
        let api_key = self.api_key()?;

        let body = ChatRequest::image_to_video(&self.api.model_id, &request.prompt, to_data_uri(image));
        let url = self.api.completions_url();
        let (url, body) = (url.as_str(), &body);

        info!(
            model = %self.api.model_id,
            image_bytes = image.len(),
            max_attempts = self.policy.max_attempts,
            max_wait_ms = self.policy.worst_case().as_millis() as u64,
            "requesting video generation"
        );

        self.policy
            .run("generate", cancel, move |attempt| {
                self.attempt(url, api_key, body, attempt)
            })
            .await
    }

    async fn attempt(
        &self,
        url: &str,
        api_key: &str,
        body: &ChatRequest,
        attempt: u32,
    ) -> Result<ExtractedMedia, ReelgenError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .header(
                ACCEPT,
                HeaderValue::from_static("text/event-stream, application/json"),
            )
            .json(body)
            .send()
            .await
            .map_err(|e| ReelgenError::Transport {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, attempt, "generation response received");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }

        let mut extractor = ResponseExtractor::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ReelgenError::Transport {
                message: format!("response stream interrupted: {e}"),
                source: Some(Box::new(e)),
            })?;

            if let Some(media) = extractor.feed(&chunk) {
                // Dropping the stream closes the connection.
                debug!(attempt, "video URL found mid-stream, closing response");
                return Ok(media);
            }
            if extractor.is_complete() {
                break;
            }
        }

        extractor.finalize().ok_or(ReelgenError::NoMediaFound)
    }

    /// Checks that `{server_url}/v1/models` answers with the configured key.
    pub async fn probe(&self) -> Result<ProbeReport, ReelgenError> {
        let api_key = self.api_key()?;
        let started = Instant::now();
        let response = self
            .http
            .get(self.api.models_url())
            .bearer_auth(api_key)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| ReelgenError::Transport {
                message: format!("probe failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let report = ProbeReport {
            status: response.status().as_u16(),
            latency: started.elapsed(),
        };
        if !report.is_ok() {
            warn!(status = report.status, "API probe returned non-success status");
        }
        Ok(report)
    }
}

#[async_trait]
impl VideoProvider for RequestClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<ExtractedMedia, ReelgenError> {
        RequestClient::generate(self, request, cancel).await
    }
}

/// Maps a non-success status to an error, retryable for 429 and 5xx only.
fn status_error(status: StatusCode, body: &str) -> ReelgenError {
    let code = status.as_u16();
    if status == StatusCode::FORBIDDEN {
        return ReelgenError::Api {
            status: code,
            message: "credential rejected; check the API key and its permissions".into(),
        };
    }

    let detail = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => parsed.error.message().to_string(),
        Err(_) => snippet(body),
    };

    if status.is_server_error() {
        ReelgenError::Transport {
            message: format!("API returned {status}: {detail}"),
            source: None,
        }
    } else {
        ReelgenError::Api {
            status: code,
            message: detail,
        }
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(ERROR_SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelgen_core::{ErrorKind, SourceForm, UserId};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nrest";

    fn test_config() -> ApiConfig {
        ApiConfig {
            api_key: Some("test-key".into()),
            model_id: "test-model".into(),
            timeout_seconds: 5,
            max_retry_attempts: 3,
            retry_backoff_ms: 10,
            retry_backoff_max_ms: 20,
            ..ApiConfig::default()
        }
    }

    fn test_client(base_url: &str) -> RequestClient {
        RequestClient::new(&test_config())
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn request(image: Option<&[u8]>) -> GenerationRequest {
        GenerationRequest::new(None, UserId("u1".into()), "make it move", image.map(<[u8]>::to_vec))
    }

    fn sse_body(contents: &[&str]) -> String {
        let mut body = String::new();
        for content in contents {
            let chunk = serde_json::json!({"choices": [{"delta": {"content": content}}]});
            body.push_str(&format!("data: {chunk}\n\n"));
        }
        body.push_str("data: [DONE]\n\n");
        body
    }

    #[tokio::test]
    async fn streamed_response_yields_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_body(&["Here: ", "https://cdn.example.com/v/1.mp4", " enjoy"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let media = test_client(&server.uri())
            .generate(&request(Some(PNG)), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(media.video_url, "https://cdn.example.com/v/1.mp4");
        assert_eq!(media.source_form, SourceForm::PlainUrl);
    }

    #[tokio::test]
    async fn buffered_json_response_yields_url() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "choices": [{"message": {"content": "done", "attachments": [{"url": "https://cdn.example.com/a.webm"}]}}]
        });
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let media = test_client(&server.uri())
            .generate(&request(Some(PNG)), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(media.video_url, "https://cdn.example.com/a.webm");
        assert_eq!(media.source_form, SourceForm::JsonField);
    }

    #[tokio::test]
    async fn sends_auth_and_multimodal_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "stream": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(sse_body(&[
                "<video src=\"https://cdn.example.com/x.mp4\"></video>",
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let result = test_client(&server.uri())
            .generate(&request(Some(PNG)), &CancellationToken::new())
            .await;
        assert!(result.is_ok(), "request should match: {result:?}");
    }

    #[tokio::test]
    async fn missing_image_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate(&request(None), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingImage);

        let err = client
            .generate(&request(Some(b"".as_slice())), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingImage);
    }

    #[tokio::test]
    async fn missing_api_key_is_config_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = ApiConfig {
            api_key: Some("  ".into()),
            ..test_config()
        };
        let client = RequestClient::new(&config)
            .unwrap()
            .with_base_url(server.uri());
        let err = client
            .generate(&request(Some(PNG)), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[tokio::test]
    async fn server_errors_exhaust_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(3)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate(&request(Some(PNG)), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Exhausted);
        assert_eq!(err.root().kind(), ErrorKind::TransportFailure);
        assert!(err.to_string().contains("overloaded"), "got: {err}");
    }

    #[tokio::test]
    async fn rate_limit_is_retried_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(sse_body(&["[clip](https://cdn.example.com/c.mp4)"])),
            )
            .mount(&server)
            .await;

        let media = test_client(&server.uri())
            .generate(&request(Some(PNG)), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(media.source_form, SourceForm::MarkdownLink);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"message": "unknown model", "type": "invalid_request_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate(&request(Some(PNG)), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ReelgenError::Api { status: 400, ref message } if message == "unknown model"));
    }

    #[tokio::test]
    async fn forbidden_maps_to_credential_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("secret internals"))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate(&request(Some(PNG)), &CancellationToken::new())
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("credential rejected"), "got: {message}");
        assert!(!message.contains("secret internals"));
    }

    #[tokio::test]
    async fn response_without_video_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(sse_body(&["I cannot help"])))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate(&request(Some(PNG)), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoMediaFound);
    }

    #[tokio::test]
    async fn slow_responses_time_out_each_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_string(sse_body(&["https://cdn.example.com/late.mp4 "])),
            )
            .expect(2)
            .mount(&server)
            .await;

        let mut client = test_client(&server.uri());
        client.policy.timeout = Duration::from_millis(200);
        client.policy.max_attempts = 2;

        let err = client
            .generate(&request(Some(PNG)), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ReelgenError::Exhausted { attempts: 2, .. }));
        assert_eq!(err.root().kind(), ErrorKind::Timeout);
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let long = "x".repeat(2000);
        let err = status_error(StatusCode::BAD_REQUEST, &long);
        match err {
            ReelgenError::Api { message, .. } => assert_eq!(message.len(), ERROR_SNIPPET_CHARS),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn probe_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .mount(&server)
            .await;

        let report = test_client(&server.uri()).probe().await.unwrap();
        assert!(report.is_ok());
        assert_eq!(report.status, 200);
    }
}
