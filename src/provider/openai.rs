//! OpenAI chat-completions client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Provider, ProviderError};

/// Base URL for the OpenAI API
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// How long a single completion request may run before it is abandoned
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Role instructions sent with every completion request
const SYSTEM_PROMPT: &str = "You are a concise, friendly daily health & fitness coach. \
     Produce one short actionable tip (1-2 sentences) aimed at general adults. \
     Keep it safe and non-medical.";

/// Client for the OpenAI chat-completions endpoint
///
/// Requests carry a fixed system prompt and a bounded timeout; a request
/// that outlives the timeout fails instead of hanging the caller.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Creates a client for the given API key and model name.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            model: model.into(),
        })
    }

    /// Points the client at a different API root
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Provider for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: 120,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(parsed) => parsed.error.message,
                Err(_) => body,
            };
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyCompletion)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_parses_completion_content() {
        let body = r#"{
            "choices": [
                {
                    "message": {"role": "assistant", "content": "Drink water."},
                    "finish_reason": "stop"
                }
            ],
            "usage": {"prompt_tokens": 30, "completion_tokens": 4, "total_tokens": 34}
        }"#;

        let response: ChatResponse = serde_json::from_str(body).expect("should parse");
        let content = response.choices[0].message.content.as_deref();
        assert_eq!(content, Some("Drink water."));
    }

    #[test]
    fn test_chat_response_tolerates_missing_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant"}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).expect("should parse");
        assert!(response.choices[0].message.content.is_none());
    }

    #[test]
    fn test_api_error_body_parses_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(body).expect("should parse");
        assert_eq!(parsed.error.message, "Incorrect API key provided");
    }

    #[test]
    fn test_chat_request_serializes_system_and_user_messages() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "be brief",
                },
                ChatMessage {
                    role: "user",
                    content: "one tip",
                },
            ],
            max_tokens: 120,
            temperature: 0.7,
        };

        let json = serde_json::to_value(&request).expect("should serialize");
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "one tip");
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let client =
            OpenAiClient::new("sk-secret", "gpt-4o-mini").expect("client should build");
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
