//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::models::{PromptPair, WebsiteData};
use crate::traits::{Completer, PageFetcher};

// ---------------------------------------------------------------------------
// MockPageFetcher
// ---------------------------------------------------------------------------

/// Mock page fetcher that returns a fixed page and records requested URLs.
#[derive(Clone)]
pub struct MockPageFetcher {
    page: WebsiteData,
    calls: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockPageFetcher {
    pub fn new(page: WebsiteData) -> Self {
        Self {
            page,
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Sleep before returning the page, to exercise cancellation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// URLs passed to `fetch`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockPageFetcher {
    fn default() -> Self {
        Self::new(WebsiteData::new(
            "http://site.test",
            "Test Site",
            "default body",
        ))
    }
}

impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> WebsiteData {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        WebsiteData {
            url: url.to_string(),
            ..self.page.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// MockCompleter
// ---------------------------------------------------------------------------

/// Mock completer that returns queued responses and records every prompt.
#[derive(Clone)]
pub struct MockCompleter {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default string.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    prompts: Arc<Mutex<Vec<PromptPair>>>,
    model: String,
    delay: Option<Duration>,
}

impl MockCompleter {
    pub fn new(text: &str) -> Self {
        Self::with_responses(vec![Ok(text.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            prompts: Arc::new(Mutex::new(Vec::new())),
            model: "mock-model".to_string(),
            delay: None,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Sleep before answering, to exercise cancellation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<PromptPair> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Completer for MockCompleter {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, AppError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("default completion".to_string())
        } else {
            responses.remove(0)
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
