//! OpenAI-compatible chat-completions client.
//!
//! Works against any endpoint that speaks the `/chat/completions` shape,
//! which covers the usual proxies. One request per call; the caller
//! decides whether to ask again.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error::{classify_http_status, LlmError, LlmErrorKind};
use super::{ChatMessage, ChatOptions, ModelGateway};
use crate::config::Config;

/// OpenAI-compatible API client.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model_name: String,
}

impl OpenAiClient {
    /// Create a client from the process configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_name: config.model_name.clone(),
        }
    }

    /// Create an LlmError from HTTP response status and body.
    fn create_error(status: reqwest::StatusCode, body: &str) -> LlmError {
        let status_code = status.as_u16();
        match classify_http_status(status_code) {
            LlmErrorKind::RateLimited => LlmError::rate_limited(body.to_string()),
            LlmErrorKind::ClientError => LlmError::client_error(status_code, body.to_string()),
            _ => LlmError::server_error(status_code, body.to_string()),
        }
    }
}

#[async_trait]
impl ModelGateway for OpenAiClient {
    async fn converse(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: &self.model_name,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = match self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                if e.is_timeout() {
                    return Err(LlmError::network_error(format!("Request timeout: {}", e)));
                } else if e.is_connect() {
                    return Err(LlmError::network_error(format!("Connection failed: {}", e)));
                } else {
                    return Err(LlmError::network_error(format!("Request failed: {}", e)));
                }
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(Self::create_error(status, &body));
        }

        let parsed: CompletionResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::malformed_response(format!("Failed to parse response: {}, body: {}", e, body))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::malformed_response("No choices in response".to_string()))?;

        choice
            .message
            .content
            .ok_or_else(|| LlmError::malformed_response("Empty completion content".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u64>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}
