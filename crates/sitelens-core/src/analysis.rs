use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::models::{AnalysisParams, ClientType, Provider};
use crate::prompts;
use crate::traits::{Completer, PageFetcher};

/// One analysis type bound to one provider backend.
///
/// Generic over the page fetcher and the completer so the pipeline can be
/// exercised without real HTTP or LLM calls.
#[derive(Clone)]
pub struct AnalysisClient<P, C>
where
    P: PageFetcher,
    C: Completer,
{
    pages: P,
    completer: C,
    provider: Provider,
    client_type: ClientType,
}

impl<P, C> AnalysisClient<P, C>
where
    P: PageFetcher,
    C: Completer,
{
    pub fn new(pages: P, completer: C, provider: Provider, client_type: ClientType) -> Self {
        Self {
            pages,
            completer,
            provider,
            client_type,
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn client_type(&self) -> ClientType {
        self.client_type
    }

    pub fn model(&self) -> &str {
        self.completer.model()
    }

    /// Run the analysis for a URL.
    ///
    /// 1. Fetch the page (failures become sentinel page data)
    /// 2. Build the prompt pair for this client type
    /// 3. Send it to the provider and return the model's text
    pub async fn process(&self, url: &str, params: &AnalysisParams) -> Result<String, AppError> {
        self.process_with_cancel(url, params, &CancellationToken::new())
            .await
    }

    /// Same as [`process`](Self::process), aborting with [`AppError::Cancelled`]
    /// as soon as `cancel` fires.
    pub async fn process_with_cancel(
        &self,
        url: &str,
        params: &AnalysisParams,
        cancel: &CancellationToken,
    ) -> Result<String, AppError> {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        // 1. Fetch
        tracing::info!(%url, client_type = %self.client_type, "Fetching page");
        let data = tokio::select! {
            data = self.pages.fetch(url) => data,
            () = cancel.cancelled() => return Err(AppError::Cancelled),
        };
        if data.is_fetch_failure() {
            tracing::warn!(%url, reason = %data.text, "Continuing with fetch failure text");
        } else {
            tracing::info!(title = %data.title, chars = data.text.len(), "Fetched page");
        }

        // 2. Prompt
        let prompt = prompts::build(self.client_type, &data, params);

        // 3. Complete
        tracing::info!(
            provider = %self.provider,
            model = %self.completer.model(),
            "Requesting completion"
        );
        let result = tokio::select! {
            result = self.completer.complete(&prompt) => result?,
            () = cancel.cancelled() => return Err(AppError::Cancelled),
        };
        tracing::info!(chars = result.len(), "Analysis complete");

        Ok(result)
    }
}
