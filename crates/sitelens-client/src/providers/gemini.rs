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

pub const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini `generateContent` client.
///
/// Gemini has no system channel here, so the system and user prompts are
/// joined with a blank line into a single prompt.
#[derive(Clone)]
pub struct GeminiAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    model_diagnostics: bool,
}

impl GeminiAdapter {
    pub fn new(api_key: &str, model: &str) -> Result<Self, AppError> {
        Self::with_base_url(api_key, model, GOOGLE_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> Result<Self, AppError> {
        Self::build(api_key, model, base_url, DEFAULT_COMPLETION_TIMEOUT)
    }

    pub fn with_timeout(self, timeout: Duration) -> Result<Self, AppError> {
        let diagnostics = self.model_diagnostics;
        Ok(Self::build(&self.api_key, &self.model, &self.base_url, timeout)?
            .with_model_diagnostics(diagnostics))
    }

    /// When enabled, API errors are annotated with the models the key can use.
    pub fn with_model_diagnostics(mut self, enabled: bool) -> Self {
        self.model_diagnostics = enabled;
        self
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
            model_diagnostics: false,
        })
    }

    /// Lists the model names (`models/...`) available to this API key.
    pub async fn list_models(&self) -> Result<Vec<String>, AppError> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: ModelList = response
            .json()
            .await
            .map_err(|e| parse_error(e, self.timeout))?;

        Ok(body.models.into_iter().map(|m| m.name).collect())
    }

    async fn generate(&self, prompt: &PromptPair) -> Result<String, AppError> {
        let model = self.model.trim_start_matches("models/");
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.combined()),
                }],
            }],
        };

        tracing::debug!(%url, "Sending generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| parse_error(e, self.timeout))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(empty_response)
    }

    /// Adds the list of available models to an API-level error.
    async fn annotate(&self, error: AppError) -> AppError {
        let AppError::LlmError {
            message,
            status_code,
        } = error
        else {
            return error;
        };

        let message = match self.list_models().await {
            Ok(models) => format!(
                "Error with Gemini model '{}'. Available models: {}\nOriginal error: {}",
                self.model,
                models.join(", "),
                message
            ),
            Err(list_err) => {
                tracing::warn!(error = %list_err, "Could not list Gemini models");
                format!("Error with Gemini model '{}': {}", self.model, message)
            }
        };

        AppError::LlmError {
            message,
            status_code,
        }
    }
}

// ---- Gemini API types ----

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    name: String,
}

impl Completer for GeminiAdapter {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, AppError> {
        match self.generate(prompt).await {
            Ok(text) => Ok(text),
            Err(e) if self.model_diagnostics => Err(self.annotate(e).await),
            Err(e) => Err(e),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
