pub mod config;
pub mod factory;
pub mod fetcher;
pub mod html;
pub mod providers;
pub mod registry;

pub use config::{Credentials, FactoryConfig};
pub use factory::{ClientFactory, WebAnalysisClient};
pub use fetcher::WebContentFetcher;
pub use providers::{AnthropicAdapter, GeminiAdapter, OpenAiAdapter, ProviderAdapter};
pub use registry::list_available_providers;
