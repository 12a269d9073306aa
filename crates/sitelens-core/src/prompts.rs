//! Prompt templates, one per analysis type.
//!
//! Every template is a fixed system instruction plus a user prompt that
//! interpolates the page title and text. Only the content extractor takes
//! an extra parameter (`target_info`), which is inserted verbatim.

use crate::models::{AnalysisParams, ClientType, PromptPair, WebsiteData};

const SUMMARIZER_SYSTEM: &str = "You are an assistant that analyzes the contents of a website \
and provides a short summary, ignoring text that might be navigation related. \
Respond in markdown.";

const EXTRACTOR_SYSTEM: &str = "You are an assistant that extracts specific information from websites. \
Extract only the requested information in a structured format.";

const SENTIMENT_SYSTEM: &str = "You are an assistant that analyzes the sentiment of website content. \
Categorize the sentiment as positive, negative, or neutral and explain why.";

const SEO_SYSTEM: &str = "You are an SEO expert analyzing website content. Identify key SEO elements, \
keywords, and provide recommendations for improvement.";

pub fn system_prompt(client_type: ClientType) -> &'static str {
    match client_type {
        ClientType::Summarizer => SUMMARIZER_SYSTEM,
        ClientType::ContentExtractor => EXTRACTOR_SYSTEM,
        ClientType::SentimentAnalyzer => SENTIMENT_SYSTEM,
        ClientType::SeoAnalyzer => SEO_SYSTEM,
    }
}

pub fn user_prompt(client_type: ClientType, data: &WebsiteData, params: &AnalysisParams) -> String {
    let title = &data.title;
    let text = &data.text;

    match client_type {
        ClientType::Summarizer => format!(
            "You are looking at a website titled {title}.\n\
             The contents of this website is as follows; \
             please provide a short summary of this website in markdown. \
             If it includes news or announcements, then summarize these too.\n\n\
             {text}"
        ),
        ClientType::ContentExtractor => {
            let target = params.target_info.as_deref().unwrap_or_default();
            format!(
                "Extract the following information from this website titled {title}:\n\
                 {target}\n\n\
                 Website content:\n\
                 {text}"
            )
        }
        ClientType::SentimentAnalyzer => format!(
            "Analyze the sentiment of this website titled {title}.\n\
             Is it positive, negative, or neutral? Explain why.\n\n\
             Content:\n\
             {text}"
        ),
        ClientType::SeoAnalyzer => format!(
            "Perform an SEO analysis of this website titled {title}.\n\
             Identify key keywords, meta information, and content structure.\n\n\
             Content:\n\
             {text}"
        ),
    }
}

/// Builds the full prompt pair for one analysis.
pub fn build(client_type: ClientType, data: &WebsiteData, params: &AnalysisParams) -> PromptPair {
    PromptPair {
        system: system_prompt(client_type).to_string(),
        user: user_prompt(client_type, data, params),
    }
}
