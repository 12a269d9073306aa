use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sitelens_core::error::AppError;
use sitelens_core::models::PromptPair;
use sitelens_core::traits::Completer;

use super::{
    DEFAULT_COMPLETION_TIMEOUT, empty_response, error_from_response, http_client, map_send_error,
    normalize_base_url, parse_error,
};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Output ceiling sent with every Messages API request.
pub const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Anthropic Messages API client.
///
/// The system prompt travels as a top-level field; only the user prompt is
/// sent as a message.
#[derive(Clone)]
pub struct AnthropicAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl AnthropicAdapter {
    pub fn new(api_key: &str, model: &str) -> Result<Self, AppError> {
        Self::with_base_url(api_key, model, ANTHROPIC_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> Result<Self, AppError> {
        Self::build(api_key, model, base_url, DEFAULT_COMPLETION_TIMEOUT)
    }

    pub fn with_timeout(self, timeout: Duration) -> Result<Self, AppError> {
        Self::build(&self.api_key, &self.model, &self.base_url, timeout)
    }

    fn build(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: normalize_base_url(base_url),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
        })
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl Completer for AnthropicAdapter {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, AppError> {
        let url = format!("{}/messages", self.base_url);

        let request = MessagesRequest {
            model: &self.model,
            system: &prompt.system,
            messages: [UserMessage {
                role: "user",
                content: &prompt.user,
            }],
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        tracing::debug!(%url, model = %self.model, "Sending messages request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| parse_error(e, self.timeout))?;

        body.content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(empty_response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
