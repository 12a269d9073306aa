pub mod analysis;
pub mod error;
pub mod history;
pub mod models;
pub mod prompts;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use analysis::AnalysisClient;
pub use error::AppError;
pub use history::{HistoryEntry, SessionHistory};
pub use models::{AnalysisParams, AnalysisRequest, ClientType, PromptPair, Provider, WebsiteData};
pub use traits::{Completer, PageFetcher};
