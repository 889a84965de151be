//! LLM Client: the single point of entry for all model calls.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! Handlers pick a [`Provider`]; [`ProviderRegistry::generate`] routes the prompt to the
//! configured backend and returns its raw text. No retries and no fallback between
//! providers: a failed call ends the request.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;

pub mod gemini;
pub mod openai;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Selectors that name a provider we know about but have not built yet.
const UNIMPLEMENTED_SELECTORS: &[&str] = &["tertiary-unimplemented", "claude", "anthropic"];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No API key configured for provider '{0}'")]
    MissingApiKey(String),

    #[error("Provider '{0}' is not supported")]
    NotSupported(String),
}

/// The provider selected for a request. Parsed once at the HTTP boundary;
/// everything downstream matches on it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Provider {
    /// Google Gemini `generateContent`.
    #[default]
    Primary,
    /// OpenAI chat completions.
    Secondary,
    /// Named but not wired to any backend.
    Unimplemented(String),
}

#[derive(Debug, Error)]
#[error("unknown model provider '{0}'")]
pub struct UnknownProvider(pub String);

impl Provider {
    /// Resolves an optional form value. Missing or blank means the default provider.
    pub fn from_selector(raw: Option<&str>) -> Result<Self, UnknownProvider> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse(),
            None => Ok(Provider::default()),
        }
    }
}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "primary" | "gemini" => Ok(Provider::Primary),
            "secondary" | "openai" => Ok(Provider::Secondary),
            name if UNIMPLEMENTED_SELECTORS.contains(&name) => {
                Ok(Provider::Unimplemented(name.to_string()))
            }
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Primary => write!(f, "primary"),
            Provider::Secondary => write!(f, "secondary"),
            Provider::Unimplemented(name) => write!(f, "{name}"),
        }
    }
}

/// A backend able to turn one user prompt into raw model text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Holds the configured backends. A provider whose API key is absent stays `None`.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    primary: Option<Arc<dyn LlmProvider>>,
    secondary: Option<Arc<dyn LlmProvider>>,
}

impl ProviderRegistry {
    pub fn new(
        primary: Option<Arc<dyn LlmProvider>>,
        secondary: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Builds one shared HTTP client and the backends whose keys are present.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let primary = config.gemini_api_key.as_ref().map(|key| {
            Arc::new(GeminiProvider::new(
                client.clone(),
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
            )) as Arc<dyn LlmProvider>
        });
        let secondary = config.openai_api_key.as_ref().map(|key| {
            Arc::new(OpenAiProvider::new(
                client.clone(),
                key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
            )) as Arc<dyn LlmProvider>
        });

        info!(
            "Providers configured: primary={} ({}), secondary={} ({})",
            primary.is_some(),
            config.gemini_model,
            secondary.is_some(),
            config.openai_model
        );

        Ok(Self::new(primary, secondary))
    }

    /// Sends `prompt` to the backend behind `provider` and returns its raw text output.
    pub async fn generate(&self, prompt: &str, provider: &Provider) -> Result<String, LlmError> {
        let backend = match provider {
            Provider::Primary => self.primary.as_ref(),
            Provider::Secondary => self.secondary.as_ref(),
            Provider::Unimplemented(name) => return Err(LlmError::NotSupported(name.clone())),
        }
        .ok_or_else(|| LlmError::MissingApiKey(provider.to_string()))?;

        debug!("Dispatching prompt ({} chars) to {}", prompt.len(), backend.name());
        backend.complete(prompt).await
    }
}

/// Error envelope shared by the Gemini and OpenAI APIs: `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Turns a non-2xx response into `LlmError::Api`, otherwise decodes the JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, LlmError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(LlmError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(LlmError::Parse)
}
