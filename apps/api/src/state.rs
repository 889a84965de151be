use crate::config::Config;
use crate::llm_client::ProviderRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub providers: ProviderRegistry,
}
