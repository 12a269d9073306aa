use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Page title and visible text scraped from a URL.
///
/// Always well-formed: a failed fetch is encoded as sentinel values
/// (see [`WebsiteData::fetch_failed`]) rather than surfaced as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteData {
    pub url: String,
    pub title: String,
    pub text: String,
}

impl WebsiteData {
    /// Title used when the document has no `<title>` element.
    pub const NO_TITLE: &'static str = "No title found";
    /// Text used when the document body yields no visible text.
    pub const NO_BODY: &'static str = "No body content found";
    /// Title used when the page could not be fetched.
    pub const ERROR_TITLE: &'static str = "Error";

    pub fn new(url: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            text: text.into(),
        }
    }

    /// Sentinel result for a page that could not be fetched.
    pub fn fetch_failed(url: impl Into<String>, error: &AppError) -> Self {
        Self::new(
            url,
            Self::ERROR_TITLE,
            format!("Failed to fetch website: {error}"),
        )
    }

    /// True if this is a sentinel produced by [`WebsiteData::fetch_failed`].
    pub fn is_fetch_failure(&self) -> bool {
        self.title == Self::ERROR_TITLE && self.text.starts_with("Failed to fetch website: ")
    }
}

/// System and user prompt sent to a language model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    /// Joins both prompts with a blank line, for backends without a system channel.
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// Remote language-model backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
    Ollama,
}

impl Provider {
    /// Every provider Sitelens knows how to talk to, in registry order.
    pub const ALL: [Provider; 4] = [
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::Google,
        Provider::Ollama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
            Provider::Ollama => "ollama",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Google => "Google Gemini",
            Provider::Ollama => "Ollama (local)",
        }
    }

    /// Ollama targets a local endpoint and accepts any placeholder key.
    pub fn requires_credentials(&self) -> bool {
        !matches!(self, Provider::Ollama)
    }

    /// Environment variable conventionally holding this provider's API key.
    pub fn credential_env_var(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Google => Some("GOOGLE_API_KEY"),
            Provider::Ollama => None,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Anthropic => "claude-3-haiku-20240307",
            Provider::Google => "gemini-pro",
            Provider::Ollama => "llama3.2",
        }
    }

    /// Suggested models shown to users. Any model name is accepted.
    pub fn known_models(&self) -> &'static [&'static str] {
        match self {
            Provider::OpenAi => &["gpt-4o-mini", "gpt-4o", "gpt-3.5-turbo"],
            Provider::Anthropic => &[
                "claude-3-opus-20240229",
                "claude-3-sonnet-20240229",
                "claude-3-haiku-20240307",
            ],
            Provider::Google => &[
                "gemini-pro",
                "gemini-1.0-pro",
                "gemini-1.5-pro",
                "gemini-1.5-flash",
            ],
            Provider::Ollama => &["llama3.2"],
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis task a client performs on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    Summarizer,
    ContentExtractor,
    SentimentAnalyzer,
    SeoAnalyzer,
}

impl ClientType {
    pub const ALL: [ClientType; 4] = [
        ClientType::Summarizer,
        ClientType::ContentExtractor,
        ClientType::SentimentAnalyzer,
        ClientType::SeoAnalyzer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Summarizer => "summarizer",
            ClientType::ContentExtractor => "content_extractor",
            ClientType::SentimentAnalyzer => "sentiment_analyzer",
            ClientType::SeoAnalyzer => "seo_analyzer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClientType::Summarizer => "Website Summary",
            ClientType::ContentExtractor => "Content Extraction",
            ClientType::SentimentAnalyzer => "Sentiment Analysis",
            ClientType::SeoAnalyzer => "SEO Analysis",
        }
    }

    /// Comma-separated list of every registered client type.
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(ClientType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::UnknownClientType {
                name: s.to_string(),
                available: Self::available(),
            })
    }
}

/// Extra, analysis-specific inputs to `process`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// What the content extractor should pull out (e.g. "company name").
    #[serde(default)]
    pub target_info: Option<String>,
}

impl AnalysisParams {
    pub fn with_target(target_info: impl Into<String>) -> Self {
        Self {
            target_info: Some(target_info.into()),
        }
    }
}

/// One analysis invocation as received from a presentation layer.
///
/// Provider and client type stay as raw strings so the factory can
/// report unknown values against the live registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub url: String,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_client_type")]
    pub client_type: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub credentials: Option<String>,
    #[serde(default, flatten)]
    pub params: AnalysisParams,
}

fn default_provider() -> String {
    Provider::OpenAi.as_str().to_string()
}

fn default_client_type() -> String {
    ClientType::Summarizer.as_str().to_string()
}
