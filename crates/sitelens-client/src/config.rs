use std::time::Duration;

use sitelens_core::AppError;
use sitelens_core::models::Provider;

use crate::fetcher::{DEFAULT_FETCH_TIMEOUT, DEFAULT_USER_AGENT};
use crate::providers::{
    ANTHROPIC_BASE_URL, DEFAULT_COMPLETION_TIMEOUT, GOOGLE_BASE_URL, OLLAMA_BASE_URL,
    OPENAI_BASE_URL,
};

/// Settings shared by every client the factory builds.
#[derive(Debug, Clone)]
pub struct FactoryConfig {
    pub fetch_timeout: Duration,
    pub completion_timeout: Duration,
    pub user_agent: String,
    pub openai_base_url: String,
    pub anthropic_base_url: String,
    pub google_base_url: String,
    pub ollama_base_url: String,
    /// Annotate Gemini API errors with the list of available models.
    pub model_diagnostics: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            openai_base_url: OPENAI_BASE_URL.to_string(),
            anthropic_base_url: ANTHROPIC_BASE_URL.to_string(),
            google_base_url: GOOGLE_BASE_URL.to_string(),
            ollama_base_url: OLLAMA_BASE_URL.to_string(),
            model_diagnostics: false,
        }
    }
}

impl FactoryConfig {
    /// Read configuration from environment variables.
    ///
    /// - `SITELENS_FETCH_TIMEOUT_SECS` (optional, defaults to 10)
    /// - `SITELENS_COMPLETION_TIMEOUT_SECS` (optional, defaults to 60)
    /// - `SITELENS_USER_AGENT` (optional)
    /// - `SITELENS_MODEL_DIAGNOSTICS` (optional, `true`/`false`)
    /// - `OPENAI_BASE_URL`, `ANTHROPIC_BASE_URL`, `GOOGLE_BASE_URL`, `OLLAMA_BASE_URL` (optional)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let fetch_timeout = match lookup("SITELENS_FETCH_TIMEOUT_SECS") {
            None => defaults.fetch_timeout,
            Some(raw) => parse_secs("SITELENS_FETCH_TIMEOUT_SECS", &raw)?,
        };
        let completion_timeout = match lookup("SITELENS_COMPLETION_TIMEOUT_SECS") {
            None => defaults.completion_timeout,
            Some(raw) => parse_secs("SITELENS_COMPLETION_TIMEOUT_SECS", &raw)?,
        };
        let model_diagnostics = match lookup("SITELENS_MODEL_DIAGNOSTICS") {
            None => defaults.model_diagnostics,
            Some(raw) => raw.trim().parse::<bool>().map_err(|_| {
                AppError::ConfigError(format!(
                    "Invalid SITELENS_MODEL_DIAGNOSTICS '{raw}': must be true or false"
                ))
            })?,
        };

        Ok(Self {
            fetch_timeout,
            completion_timeout,
            user_agent: lookup("SITELENS_USER_AGENT").unwrap_or(defaults.user_agent),
            openai_base_url: lookup("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            anthropic_base_url: lookup("ANTHROPIC_BASE_URL").unwrap_or(defaults.anthropic_base_url),
            google_base_url: lookup("GOOGLE_BASE_URL").unwrap_or(defaults.google_base_url),
            ollama_base_url: lookup("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            model_diagnostics,
        })
    }

    pub fn base_url(&self, provider: Provider) -> &str {
        match provider {
            Provider::OpenAi => &self.openai_base_url,
            Provider::Anthropic => &self.anthropic_base_url,
            Provider::Google => &self.google_base_url,
            Provider::Ollama => &self.ollama_base_url,
        }
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration, AppError> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        AppError::ConfigError(format!(
            "Invalid {key} '{raw}': must be a positive integer"
        ))
    })?;
    if secs == 0 {
        return Err(AppError::ConfigError(format!("{key} must be at least 1")));
    }
    Ok(Duration::from_secs(secs))
}

/// API keys resolved from the environment, one per provider.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub openai: Option<String>,
    pub anthropic: Option<String>,
    pub google: Option<String>,
}

impl Credentials {
    /// Reads `OPENAI_API_KEY`, `ANTHROPIC_API_KEY` and `GOOGLE_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |provider: Provider| {
            provider
                .credential_env_var()
                .and_then(|var| lookup(var))
                .filter(|key| !key.trim().is_empty())
        };
        Self {
            openai: read(Provider::OpenAi),
            anthropic: read(Provider::Anthropic),
            google: read(Provider::Google),
        }
    }

    pub fn for_provider(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAi => self.openai.as_deref(),
            Provider::Anthropic => self.anthropic.as_deref(),
            Provider::Google => self.google.as_deref(),
            Provider::Ollama => None,
        }
    }

    /// An explicit key wins over the environment.
    pub fn resolve<'a>(&'a self, provider: Provider, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.for_provider(provider))
    }
}
