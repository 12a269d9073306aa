//! Static registry of compiled-in providers and client types.
//!
//! The set of providers is fixed at build time through the crate features
//! `openai`, `anthropic`, `google` and `ollama`. Error messages for unknown
//! names are computed from this live set.

use sitelens_core::error::AppError;
use sitelens_core::models::{ClientType, Provider};

/// Whether the adapter for `provider` was compiled into this build.
pub const fn is_enabled(provider: Provider) -> bool {
    match provider {
        Provider::OpenAi => cfg!(feature = "openai"),
        Provider::Anthropic => cfg!(feature = "anthropic"),
        Provider::Google => cfg!(feature = "google"),
        Provider::Ollama => cfg!(feature = "ollama"),
    }
}

/// Providers enabled in this build, in registry order.
pub fn list_available_providers() -> Vec<Provider> {
    Provider::ALL.into_iter().filter(|p| is_enabled(*p)).collect()
}

/// Case-insensitive provider lookup against the enabled set.
pub fn lookup_provider(name: &str) -> Result<Provider, AppError> {
    let wanted = name.trim();
    list_available_providers()
        .into_iter()
        .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| AppError::UnknownProvider {
            name: name.to_string(),
            available: join(list_available_providers().iter().map(Provider::as_str)),
        })
}

/// Exact client type lookup against every registered analysis type.
pub fn lookup_client_type(name: &str) -> Result<ClientType, AppError> {
    name.parse()
}

fn join<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}
