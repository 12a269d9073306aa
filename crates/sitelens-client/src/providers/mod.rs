//! Provider adapters: one per remote API shape.
//!
//! Each adapter turns a [`PromptPair`] into its backend's request body and
//! pulls plain text back out of the backend's response envelope. Ollama
//! speaks the OpenAI wire format, so it reuses [`OpenAiAdapter`].

mod anthropic;
mod gemini;
mod openai;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use sitelens_core::error::AppError;
use sitelens_core::models::PromptPair;
use sitelens_core::traits::Completer;

pub use anthropic::{ANTHROPIC_BASE_URL, ANTHROPIC_VERSION, AnthropicAdapter, MAX_OUTPUT_TOKENS};
pub use gemini::{GOOGLE_BASE_URL, GeminiAdapter};
pub use openai::{OLLAMA_BASE_URL, OLLAMA_PLACEHOLDER_KEY, OPENAI_BASE_URL, OpenAiAdapter};

pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Any backend adapter, selected by the factory at construction time.
#[derive(Clone)]
pub enum ProviderAdapter {
    /// OpenAI and every OpenAI-compatible endpoint (Ollama included).
    OpenAi(OpenAiAdapter),
    Anthropic(AnthropicAdapter),
    Gemini(GeminiAdapter),
}

impl Completer for ProviderAdapter {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, AppError> {
        match self {
            ProviderAdapter::OpenAi(adapter) => adapter.complete(prompt).await,
            ProviderAdapter::Anthropic(adapter) => adapter.complete(prompt).await,
            ProviderAdapter::Gemini(adapter) => adapter.complete(prompt).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            ProviderAdapter::OpenAi(adapter) => adapter.model(),
            ProviderAdapter::Anthropic(adapter) => adapter.model(),
            ProviderAdapter::Gemini(adapter) => adapter.model(),
        }
    }
}

// ---- shared plumbing ----

pub(crate) fn http_client(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::HttpError(e.to_string()))
}

pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

pub(crate) fn map_send_error(e: reqwest::Error, timeout: Duration) -> AppError {
    if e.is_timeout() {
        AppError::timed_out(timeout)
    } else if e.is_connect() {
        AppError::NetworkError(format!("Connection failed: {e}"))
    } else {
        AppError::HttpError(e.to_string())
    }
}

/// Error envelope shared by the OpenAI, Anthropic and Gemini APIs.
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Converts a non-2xx provider response into an [`AppError`].
pub(crate) async fn error_from_response(response: Response) -> AppError {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return AppError::RateLimitExceeded;
    }

    let status_code = status.as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| format!("HTTP {status_code}: {body}"));

    AppError::LlmError {
        message,
        status_code,
    }
}

pub(crate) fn parse_error(e: reqwest::Error, timeout: Duration) -> AppError {
    if e.is_timeout() {
        AppError::timed_out(timeout)
    } else {
        AppError::HttpError(format!("Failed to parse LLM response: {e}"))
    }
}

pub(crate) fn empty_response() -> AppError {
    AppError::LlmError {
        message: "Empty response from LLM".into(),
        status_code: 200,
    }
}
