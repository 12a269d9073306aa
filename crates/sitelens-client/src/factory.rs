use sitelens_core::analysis::AnalysisClient;
use sitelens_core::error::AppError;
use sitelens_core::models::{AnalysisRequest, ClientType, Provider};

use crate::config::FactoryConfig;
use crate::fetcher::{WebContentFetcher, default_headers};
use crate::providers::{AnthropicAdapter, GeminiAdapter, OpenAiAdapter, ProviderAdapter};
use crate::registry::{list_available_providers, lookup_client_type, lookup_provider};

/// A client built by [`ClientFactory`]: real page fetching and a real provider.
pub type WebAnalysisClient = AnalysisClient<WebContentFetcher, ProviderAdapter>;

/// Builds analysis clients by pairing a provider adapter with a prompt template.
///
/// This is the only place that binds adapters to analysis types. Creation
/// performs no network I/O: configuration errors (unknown names, missing
/// credentials) are reported before anything is fetched.
#[derive(Debug, Clone, Default)]
pub struct ClientFactory {
    config: FactoryConfig,
}

impl ClientFactory {
    pub fn new(config: FactoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Create a client for `provider` × `client_type`.
    ///
    /// - `provider` is matched case-insensitively against the compiled registry
    /// - `client_type` must be one of the registered analysis types
    /// - `model` falls back to the provider's default when `None` or blank
    /// - `credentials` is required (non-blank) for every provider but Ollama
    pub fn create_client(
        &self,
        provider: &str,
        client_type: &str,
        model: Option<&str>,
        credentials: Option<&str>,
    ) -> Result<WebAnalysisClient, AppError> {
        let provider = lookup_provider(provider)?;
        let client_type = lookup_client_type(client_type)?;
        let credentials = credentials.map(str::trim).filter(|key| !key.is_empty());

        if provider.requires_credentials() && credentials.is_none() {
            return Err(AppError::ConfigError(missing_credential_message(provider)));
        }

        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| provider.default_model());

        let adapter = self.adapter(provider, model, credentials.unwrap_or_default())?;
        let pages = WebContentFetcher::with_headers(
            default_headers(&self.config.user_agent)?,
            self.config.fetch_timeout,
        )?;

        tracing::debug!(%provider, %client_type, %model, "Created analysis client");

        Ok(AnalysisClient::new(pages, adapter, provider, client_type))
    }

    /// Same as [`create_client`](Self::create_client), reading every field from a request.
    pub fn create_from_request(
        &self,
        request: &AnalysisRequest,
    ) -> Result<WebAnalysisClient, AppError> {
        self.create_client(
            &request.provider,
            &request.client_type,
            request.model.as_deref(),
            request.credentials.as_deref(),
        )
    }

    /// Providers compiled into this build.
    pub fn available_providers(&self) -> Vec<Provider> {
        list_available_providers()
    }

    /// Suggested models for a provider name.
    pub fn available_models(&self, provider: &str) -> Result<&'static [&'static str], AppError> {
        Ok(lookup_provider(provider)?.known_models())
    }

    pub fn available_client_types(&self) -> &'static [ClientType] {
        &ClientType::ALL
    }

    fn adapter(
        &self,
        provider: Provider,
        model: &str,
        api_key: &str,
    ) -> Result<ProviderAdapter, AppError> {
        let base_url = self.config.base_url(provider);
        let timeout = self.config.completion_timeout;

        let adapter = match provider {
            Provider::OpenAi => ProviderAdapter::OpenAi(
                OpenAiAdapter::with_base_url(api_key, model, base_url)?.with_timeout(timeout)?,
            ),
            Provider::Ollama => {
                let adapter = if api_key.is_empty() {
                    OpenAiAdapter::ollama(model, base_url)?
                } else {
                    OpenAiAdapter::with_base_url(api_key, model, base_url)?
                };
                ProviderAdapter::OpenAi(adapter.with_timeout(timeout)?)
            }
            Provider::Anthropic => ProviderAdapter::Anthropic(
                AnthropicAdapter::with_base_url(api_key, model, base_url)?.with_timeout(timeout)?,
            ),
            Provider::Google => ProviderAdapter::Gemini(
                GeminiAdapter::with_base_url(api_key, model, base_url)?
                    .with_model_diagnostics(self.config.model_diagnostics)
                    .with_timeout(timeout)?,
            ),
        };
        Ok(adapter)
    }
}

fn missing_credential_message(provider: Provider) -> String {
    match provider.credential_env_var() {
        Some(var) => format!(
            "{} API key is required (pass it explicitly or set {var})",
            provider.display_name()
        ),
        None => format!("{} API key is required", provider.display_name()),
    }
}
