use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::ChatRole;

/// Errors that can occur when calling the generative language API
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Prompt was blocked: {0}")]
    Blocked(String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Generative API key is not configured")]
    NotConfigured,
}

/// One turn of a conversation sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role("model", text)
    }

    pub fn from_chat(role: ChatRole, text: impl Into<String>) -> Self {
        match role {
            ChatRole::User => Self::user(text),
            ChatRole::Assistant => Self::model(text),
        }
    }

    fn with_role(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SystemInstruction<'a> {
    parts: Vec<PartRef<'a>>,
}

#[derive(Debug, Serialize)]
struct PartRef<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: &'a [Content],
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Output format requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// Client for the `generateContent` endpoint of the generative language API
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    client: Client,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            model,
            temperature: 0.7,
            max_output_tokens: 2048,
            client,
        })
    }

    /// Override sampling temperature and output length
    pub fn with_generation(mut self, temperature: f32, max_output_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Run one generation and return the concatenated text of the first
    /// candidate
    pub async fn generate(
        &self,
        system_prompt: &str,
        contents: &[Content],
        format: ResponseFormat,
    ) -> Result<String, GeminiError> {
        if self.api_key.is_empty() {
            return Err(GeminiError::NotConfigured);
        }

        let request = GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![PartRef { text: system_prompt }],
            },
            contents,
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
                response_mime_type: match format {
                    ResponseFormat::Json => Some("application/json"),
                    ResponseFormat::Text => None,
                },
            },
        };

        tracing::debug!(
            "Calling generateContent on {} with {} turns",
            self.model,
            contents.len()
        );

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            tracing::error!("generateContent failed: {} - {}", status, message);
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        extract_text(body)
    }
}

fn extract_text(body: GenerateContentResponse) -> Result<String, GeminiError> {
    if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GeminiError::Blocked(reason));
    }

    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or(GeminiError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_default();
        let blocked = matches!(reason.as_str(), "SAFETY" | "RECITATION" | "BLOCKLIST");
        return Err(if blocked {
            GeminiError::Blocked(reason)
        } else {
            GeminiError::EmptyResponse
        });
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: String) -> GeminiClient {
        GeminiClient::new(
            endpoint,
            "test key".to_string(),
            "gemini-test".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_generate_url_encodes_key() {
        let client = client("https://example.test/v1beta/".to_string());
        assert_eq!(
            client.generate_url(),
            "https://example.test/v1beta/models/gemini-test:generateContent?key=test%20key"
        );
    }

    #[test]
    fn test_content_roles() {
        assert_eq!(Content::from_chat(ChatRole::User, "hi").role, "user");
        assert_eq!(Content::from_chat(ChatRole::Assistant, "hello").role, "model");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Eat "}, {"text": "greens."}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert_eq!(extract_text(body).unwrap(), "Eat greens.");
    }

    #[test]
    fn test_extract_text_blocked() {
        let body: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();

        assert!(matches!(extract_text(body), Err(GeminiError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn test_extract_text_empty() {
        let body: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"candidates": []})).unwrap();
        assert!(matches!(extract_text(body), Err(GeminiError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_missing_key_is_rejected_before_request() {
        let client = GeminiClient::new(
            "http://127.0.0.1:9".to_string(),
            String::new(),
            "gemini-test".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();

        let result = client
            .generate("system", &[Content::user("hi")], ResponseFormat::Text)
            .await;
        assert!(matches!(result, Err(GeminiError::NotConfigured)));
    }
}
