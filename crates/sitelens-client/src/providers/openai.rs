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

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
/// Ollama ignores the bearer token but OpenAI-style clients must send one.
pub const OLLAMA_PLACEHOLDER_KEY: &str = "ollama";

/// Chat-completions client for OpenAI and OpenAI-compatible servers.
///
/// Works with:
/// - OpenAI directly (`https://api.openai.com/v1`)
/// - A local Ollama server (`http://localhost:11434/v1`)
#[derive(Clone)]
pub struct OpenAiAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl OpenAiAdapter {
    pub fn new(api_key: &str, model: &str) -> Result<Self, AppError> {
        Self::with_base_url(api_key, model, OPENAI_BASE_URL)
    }

    /// Adapter for a local Ollama server, authenticated with a placeholder key.
    pub fn ollama(model: &str, base_url: &str) -> Result<Self, AppError> {
        Self::with_base_url(OLLAMA_PLACEHOLDER_KEY, model, base_url)
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

// ---- OpenAI API types ----

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
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

impl Completer for OpenAiAdapter {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, AppError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &prompt.system,
                },
                Message {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        tracing::debug!(%url, model = %self.model, "Sending chat completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| parse_error(e, self.timeout))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(empty_response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
