//! Chat-completions summarizer

use crate::config::SummaryConfig;
use crate::error::{Result, ScreenerError};
use crate::summary::prompts::render_summary_prompt;
use crate::summary::{Summarizer, SUMMARY_UNAVAILABLE};
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Summarizes resumes through an OpenAI-compatible chat-completions endpoint
pub struct OpenAiSummarizer {
    client: Client,
    api_key: String,
    config: SummaryConfig,
}

impl OpenAiSummarizer {
    pub fn new(api_key: impl Into<String>, config: SummaryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScreenerError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }

    async fn request_summary(&self, text: &str) -> Result<String> {
        let prompt = render_summary_prompt(text, self.config.max_input_chars);
        let request_body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ScreenerError::Summary(format!("API error (status {}): {}", status.as_u16(), message)));
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ScreenerError::Summary("API returned no content".to_string()))?;

        Ok(content.trim().to_string())
    }
}

impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str) -> String {
        if self.api_key.trim().is_empty() {
            return SUMMARY_UNAVAILABLE.to_string();
        }

        match self.request_summary(text).await {
            Ok(summary) => {
                debug!("Summary received ({} characters)", summary.len());
                summary
            }
            Err(e) => {
                warn!("Summary request failed: {}", e);
                let detail = match e {
                    ScreenerError::Summary(message) => message,
                    other => other.to_string(),
                };
                format!("Error generating summary: {}", detail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(api_base: &str) -> SummaryConfig {
        let mut config = Config::default().summary;
        config.api_base = api_base.to_string();
        config.timeout_secs = 2;
        config
    }

    #[tokio::test]
    async fn test_empty_key_is_unavailable() {
        let summarizer = OpenAiSummarizer::new("  ", config_for("http://127.0.0.1:9")).unwrap();
        assert_eq!(summarizer.summarize("resume").await, SUMMARY_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_network_failure_becomes_text() {
        let summarizer = OpenAiSummarizer::new("sk-test", config_for("http://127.0.0.1:9")).unwrap();
        let summary = summarizer.summarize("Python developer").await;

        assert!(summary.starts_with("Error generating summary:"), "got {}", summary);
    }

    async fn summarize_with(server: &MockServer, timeout_secs: u64) -> String {
        let mut config = config_for(&server.uri());
        config.timeout_secs = timeout_secs;
        OpenAiSummarizer::new("sk-test", config)
            .unwrap()
            .summarize("Python developer with SQL")
            .await
    }

    #[tokio::test]
    async fn test_reply_is_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "  Backend engineer.\nPython and SQL.\n" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(summarize_with(&server, 2).await, "Backend engineer.\nPython and SQL.");
    }

    #[tokio::test]
    async fn test_request_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "model": "gpt-3.5-turbo", "max_tokens": 150 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "ok" } }]
            })))
            .mount(&server)
            .await;

        assert_eq!(summarize_with(&server, 2).await, "ok");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(
            messages[0]["content"],
            "Summarize this resume in 3 lines:\nPython developer with SQL"
        );
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_api_error_message_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "Incorrect API key provided" }
            })))
            .mount(&server)
            .await;

        assert_eq!(
            summarize_with(&server, 2).await,
            "Error generating summary: API error (status 401): Incorrect API key provided"
        );
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        assert_eq!(
            summarize_with(&server, 2).await,
            "Error generating summary: API returned no content"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let summary = summarize_with(&server, 2).await;
        assert!(summary.starts_with("Error generating summary:"), "got {}", summary);
    }

    #[tokio::test]
    async fn test_slow_reply_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "choices": [{ "message": { "content": "late" } }] }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let summary = summarize_with(&server, 1).await;
        assert!(summary.starts_with("Error generating summary: request timed out"), "got {}", summary);
    }

    #[test]
    fn test_endpoint_joins_base() {
        let summarizer = OpenAiSummarizer::new("k", config_for("https://example.test/v1/")).unwrap();
        assert_eq!(summarizer.endpoint(), "https://example.test/v1/chat/completions");
    }
}
