use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};

use sitelens_client::registry::lookup_provider;
use sitelens_core::history::HistoryEntry;
use sitelens_core::models::{AnalysisRequest, ClientType};

use crate::dto::{
    AnalysisResponse, ClearHistoryResponse, ClientTypeInfo, ClientTypeListResponse,
    HealthResponse, HistoryItem, HistoryResponse, ProviderInfo, ProviderListResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/providers", get(list_providers))
        .route("/v1/client-types", get(list_client_types))
        .route("/v1/analyze", post(analyze))
        .route("/v1/history", get(get_history).delete(clear_history))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

pub async fn list_providers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let providers = state
        .factory
        .available_providers()
        .into_iter()
        .map(|provider| ProviderInfo {
            name: provider,
            display_name: provider.display_name(),
            default_model: provider.default_model(),
            models: provider.known_models(),
            requires_credentials: provider.requires_credentials(),
            credentials_configured: state.credentials.for_provider(provider).is_some(),
        })
        .collect();

    axum::Json(ProviderListResponse { providers })
}

pub async fn list_client_types() -> impl IntoResponse {
    let client_types = ClientType::ALL.into_iter().map(ClientTypeInfo::from).collect();
    axum::Json(ClientTypeListResponse { client_types })
}

// ---------------------------------------------------------------------------
// Analyze
// ---------------------------------------------------------------------------

/// Run one analysis and record it in the session history.
///
/// Credentials missing from the body fall back to the server environment.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<AnalysisRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = lookup_provider(&body.provider)?;
    let credentials = state
        .credentials
        .resolve(provider, body.credentials.as_deref());

    let client = state.factory.create_client(
        &body.provider,
        &body.client_type,
        body.model.as_deref(),
        credentials,
    )?;

    let cancel = state.shutdown.child_token();
    let result = client
        .process_with_cancel(&body.url, &body.params, &cancel)
        .await?;

    let entry = HistoryEntry::new(
        &body.url,
        client.provider(),
        client.model(),
        client.client_type(),
        result,
    );
    state.history.lock().await.push(entry.clone());

    tracing::info!(id = %entry.id, url = %entry.url, "Analysis recorded");

    Ok(axum::Json(AnalysisResponse::from(entry)))
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

pub async fn get_history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let history = state.history.lock().await;
    let entries: Vec<HistoryItem> = history
        .newest_first()
        .map(|(index, entry)| HistoryItem {
            index,
            entry: AnalysisResponse::from(entry.clone()),
        })
        .collect();
    let total = entries.len();

    axum::Json(HistoryResponse { entries, total })
}

pub async fn clear_history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let removed = state.history.lock().await.clear();
    tracing::info!(removed, "History cleared");
    axum::Json(ClearHistoryResponse { removed })
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

pub async fn health() -> impl IntoResponse {
    axum::Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
