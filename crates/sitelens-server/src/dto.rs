use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use sitelens_core::history::HistoryEntry;
use sitelens_core::models::{ClientType, Provider};

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ProviderInfo {
    pub name: Provider,
    pub display_name: &'static str,
    pub default_model: &'static str,
    pub models: &'static [&'static str],
    pub requires_credentials: bool,
    /// Whether a key for this provider was found in the server environment.
    pub credentials_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ProviderListResponse {
    pub providers: Vec<ProviderInfo>,
}

#[derive(Debug, Serialize)]
pub struct ClientTypeInfo {
    pub name: ClientType,
    pub label: &'static str,
}

impl From<ClientType> for ClientTypeInfo {
    fn from(client_type: ClientType) -> Self {
        Self {
            name: client_type,
            label: client_type.label(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClientTypeListResponse {
    pub client_types: Vec<ClientTypeInfo>,
}

// ---------------------------------------------------------------------------
// Analysis & history
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub id: Uuid,
    pub url: String,
    pub provider: Provider,
    pub model: String,
    pub client_type: ClientType,
    pub result: String,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryEntry> for AnalysisResponse {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            url: entry.url,
            provider: entry.provider,
            model: entry.model,
            client_type: entry.client_type,
            result: entry.result,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    /// 1-based position in the order the analyses ran.
    pub index: usize,
    #[serde(flatten)]
    pub entry: AnalysisResponse,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryItem>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub removed: usize,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
