//! Suggestion and identifier providers
//!
//! The engine depends only on the [`SuggestionProvider`] trait. Adapters:
//! - [`HttpSuggestionProvider`] - remote suggestion service (reqwest)
//! - [`OfflineCatalog`] - built-in suggestion tables
//! - [`FallbackProvider`] - primary provider, secondary on failure
//!
//! Response-shape normalization happens inside the adapters; the engine only
//! ever sees `Vec<String>` / `String`.

mod fallback;
mod http;
pub mod normalize;
mod offline;

pub use fallback::FallbackProvider;
pub use http::HttpSuggestionProvider;
pub use offline::OfflineCatalog;

use crate::context::SelectionContext;
use async_trait::async_trait;
use inv_common::config::{ProviderConfig, ProviderMode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Provider failure
///
/// Never surfaced to the user as a blocking error; the engine degrades to
/// an empty option list or a fallback identifier.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    /// Connection or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// No response within the bound
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Service answered with an error status
    #[error("API error: {0}")]
    Api(String),

    /// Payload was not one of the accepted shapes
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// No endpoint or source for the requested level
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

/// Source of candidate values for a level
///
/// Both calls must tolerate contexts holding `None` for unselected ancestors.
///
/// # Example
/// ```rust,ignore
/// pub struct Fixed;
///
/// #[async_trait::async_trait]
/// impl SuggestionProvider for Fixed {
///     fn name(&self) -> &'static str { "Fixed" }
///
///     async fn fetch_options(&self, _level: &str, _ctx: &SelectionContext)
///         -> Result<Vec<String>, ProviderError> {
///         Ok(vec!["One".to_string()])
///     }
///
///     async fn fetch_identifier(&self, seed: &str) -> Result<String, ProviderError> {
///         Ok(format!("{}-1", seed))
///     }
/// }
/// ```
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Candidate values for `level` given the full ancestor context
    async fn fetch_options(
        &self,
        level: &str,
        context: &SelectionContext,
    ) -> Result<Vec<String>, ProviderError>;

    /// Newly generated identifier seeded by `seed`
    async fn fetch_identifier(&self, seed: &str) -> Result<String, ProviderError>;
}

/// Bound the engine places on one provider call for `config`
///
/// In `http-with-fallback` mode the request timeout covers only the HTTP
/// attempt; the bound doubles so the offline tables still get their turn.
pub fn call_timeout(config: &ProviderConfig) -> Duration {
    let request = Duration::from_millis(config.timeout_ms);
    match config.mode {
        ProviderMode::HttpWithFallback => request * 2,
        ProviderMode::Http | ProviderMode::Offline => request,
    }
}

/// Build the provider selected by `config.mode`
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn SuggestionProvider>, ProviderError> {
    let provider: Arc<dyn SuggestionProvider> = match config.mode {
        ProviderMode::Http => Arc::new(HttpSuggestionProvider::new(config)?),
        ProviderMode::Offline => Arc::new(OfflineCatalog::new()),
        ProviderMode::HttpWithFallback => Arc::new(
            FallbackProvider::new(
                Arc::new(HttpSuggestionProvider::new(config)?),
                Arc::new(OfflineCatalog::new()),
            )
            .with_primary_timeout(Duration::from_millis(config.timeout_ms)),
        ),
    };
    Ok(provider)
}
