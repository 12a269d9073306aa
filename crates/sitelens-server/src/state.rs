use sitelens_client::{ClientFactory, Credentials};
use sitelens_core::history::SessionHistory;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Analyses kept in memory unless `SITELENS_HISTORY_LIMIT` says otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub factory: ClientFactory,
    /// API keys picked up from the environment at startup.
    pub credentials: Credentials,
    /// Shared by every caller, bounded by the history limit.
    pub history: Mutex<SessionHistory>,
    /// Cancelled on shutdown; every in-flight analysis listens on a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(factory: ClientFactory, credentials: Credentials) -> Self {
        Self::with_history_limit(factory, credentials, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(
        factory: ClientFactory,
        credentials: Credentials,
        history_limit: usize,
    ) -> Self {
        Self {
            factory,
            credentials,
            history: Mutex::new(SessionHistory::with_limit(history_limit)),
            shutdown: CancellationToken::new(),
        }
    }
}
