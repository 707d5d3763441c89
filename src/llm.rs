use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::TARGET_LLM_REQUEST;

const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Sends an instruction to a hosted model and returns its text unmodified.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(GENERATION_TIMEOUT)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build Gemini client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            endpoint: format!("{}/models/{}:generateContent", base_url.trim_end_matches('/'), model),
        })
    }

    /// Client for the configured key, or `None` when no usable key is set.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        match &config.gemini_api_key {
            Some(key) => Self::new(key, &config.gemini_api_base_url, &config.gemini_model).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt.into() }],
            }],
        };

        info!(target: TARGET_LLM_REQUEST, "Sending {} char prompt to {}", prompt.len(), self.endpoint);
        let start = std::time::Instant::now();

        let res = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LlmError(e.to_string()))?;

        let status = res.status();
        let text = res.text().await.map_err(|e| AppError::LlmError(e.to_string()))?;
        debug!(target: TARGET_LLM_REQUEST, "Gemini answered {} in {:?}", status, start.elapsed());

        let json: serde_json::Value = serde_json::from_str(&text).map_err(|_| {
            AppError::LlmError(format!("Unexpected response ({}): {}", status, text))
        })?;

        if !status.is_success() {
            let message = json["error"]["message"].as_str().unwrap_or(&text);
            return Err(AppError::LlmError(format!("{}: {}", status, message)));
        }

        extract_text(&json)
    }
}

/// Joins the text parts of the first candidate.
fn extract_text(json: &serde_json::Value) -> Result<String> {
    let parts = json["candidates"][0]["content"]["parts"].as_array();

    let reply: Option<String> = parts.map(|parts| {
        parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect()
    });

    match reply {
        Some(reply) if !reply.is_empty() => Ok(reply),
        _ => {
            let reason = json["promptFeedback"]["blockReason"]
                .as_str()
                .or_else(|| json["candidates"][0]["finishReason"].as_str())
                .unwrap_or("no text in response");
            Err(AppError::LlmError(format!("Invalid response format from Gemini: {}", reason)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Json, http::{HeaderMap, StatusCode}, routing::post, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    #[test]
    fn joins_candidate_parts() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "- one\n" }, { "text": "- two" }] },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(extract_text(&response).unwrap(), "- one\n- two");
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = extract_text(&response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new("key", "http://localhost:1/v1beta/", "gemini-test").unwrap();
        assert_eq!(client.endpoint, "http://localhost:1/v1beta/models/gemini-test:generateContent");
    }

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1beta", addr)
    }

    #[tokio::test]
    async fn sends_prompt_and_returns_text() {
        let app = Router::new().route(
            "/v1beta/models/gemini-test:generateContent",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let key = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()).unwrap_or("");
                let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or("");
                Json(json!({
                    "candidates": [{ "content": { "parts": [{ "text": format!("{}|{}", key, prompt) }] } }]
                }))
            }),
        );
        let base = serve(app).await;

        let client = GeminiClient::new("secret", &base, "gemini-test").unwrap();
        let reply = client.generate("Summarize this").await.unwrap();

        assert_eq!(reply, "secret|Summarize this");
    }

    #[tokio::test]
    async fn upstream_error_message_is_surfaced() {
        let app = Router::new().route(
            "/v1beta/models/gemini-test:generateContent",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": { "code": 400, "message": "API key not valid." } })),
                )
            }),
        );
        let base = serve(app).await;

        let client = GeminiClient::new("bad", &base, "gemini-test").unwrap();
        let err = client.generate("hi").await.unwrap_err();

        assert!(matches!(err, AppError::LlmError(_)));
        assert!(err.message().contains("API key not valid."));
    }
}
