use std::future::Future;

use crate::error::AppError;
use crate::models::{PromptPair, WebsiteData};

/// Downloads a page and reduces it to its title and visible text.
///
/// Infallible by contract: transport or HTTP failures come back as
/// [`WebsiteData::fetch_failed`] so downstream stages always get a page.
pub trait PageFetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = WebsiteData> + Send;
}

/// Sends a prompt pair to one language-model backend and returns its text.
pub trait Completer: Send + Sync + Clone {
    fn complete(&self, prompt: &PromptPair)
    -> impl Future<Output = Result<String, AppError>> + Send;

    /// Model name this completer was built for.
    fn model(&self) -> &str;
}
