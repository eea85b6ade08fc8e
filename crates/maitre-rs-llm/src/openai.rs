//! OpenAI-compatible Chat Completions client.

use crate::chat::{ChatMessage, ChatProvider, CompletionProvider};
use crate::error::LlmError;
use async_trait::async_trait;
use log::debug;
use maitre_rs_protocol::ModelParams;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default API base for the hosted OpenAI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Client for OpenAI-compatible Chat Completions endpoints.
#[derive(Clone, Debug)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Build a client for the hosted OpenAI endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Build a client from `OPENAI_API_KEY` and optional `OPENAI_BASE_URL`.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key =
            env::var(API_KEY_ENV).map_err(|_| LlmError::Config(format!("{API_KEY_ENV} not set")))?;
        let mut client = Self::new(api_key);
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            client = client.with_base_url(base_url);
        }
        Ok(client)
    }

    /// Override the API base URL for self-hosted compatible servers.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn send(
        &self,
        body: &ChatCompletionRequest<'_>,
        timeout_secs: u64,
    ) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(timeout_secs))
            .json(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LlmError::Timeout(timeout_secs)
                } else {
                    LlmError::Http(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(LlmError::Http)?;
        extract_text(parsed)
    }
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        params: &ModelParams,
    ) -> Result<String, LlmError> {
        debug!(
            "sending chat request (model={}, messages={})",
            params.model,
            messages.len()
        );
        let body = ChatCompletionRequest {
            model: &params.model,
            messages,
            temperature: params.temperature,
        };
        self.send(&body, params.timeout_secs).await
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, prompt: &str, params: &ModelParams) -> Result<String, LlmError> {
        debug!(
            "sending completion request (model={}, prompt_len={})",
            params.model,
            prompt.len()
        );
        let messages = [ChatMessage::user(prompt)];
        let body = ChatCompletionRequest {
            model: &params.model,
            messages: &messages,
            temperature: params.temperature,
        };
        self.send(&body, params.timeout_secs).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text(response: ChatCompletionResponse) -> Result<String, LlmError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or(LlmError::EmptyResponse)
}

fn map_http_error(status: StatusCode, body: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited(message),
        _ => LlmError::Provider {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ChatCompletionRequest, ChatCompletionResponse, LlmError, extract_text, map_http_error,
    };
    use crate::chat::ChatMessage;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn request_serializes_to_wire_shape() {
        let messages = [ChatMessage::user("hi"), ChatMessage::system("rules")];
        let request = ChatCompletionRequest {
            model: "gpt-4o",
            messages: &messages,
            temperature: 0.0,
        };
        let encoded = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(
            encoded,
            json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "system", "content": "rules"},
                ],
                "temperature": 0.0,
            })
        );
    }

    #[test]
    fn extract_text_returns_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "hello"}}]
        }))
        .expect("parse response");
        assert_eq!(extract_text(response).expect("text"), "hello");
    }

    #[test]
    fn extract_text_rejects_empty_content() {
        let missing: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).expect("parse response");
        assert!(matches!(extract_text(missing), Err(LlmError::EmptyResponse)));

        let blank: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": ""}}]
        }))
        .expect("parse response");
        assert!(matches!(extract_text(blank), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn status_codes_map_to_error_variants() {
        let body = r#"{"error": {"message": "bad key"}}"#;
        assert!(matches!(
            map_http_error(StatusCode::UNAUTHORIZED, body),
            LlmError::Auth(message) if message == "bad key"
        ));
        assert!(matches!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, body),
            LlmError::RateLimited(_)
        ));
        assert!(matches!(
            map_http_error(StatusCode::INTERNAL_SERVER_ERROR, "overloaded"),
            LlmError::Provider { status: 500, message } if message == "overloaded"
        ));
    }
}
