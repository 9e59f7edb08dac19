//! Primary/secondary provider chaining

use super::{ProviderError, SuggestionProvider};
use crate::context::SelectionContext;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Tries `primary`; on any failure asks `secondary`
///
/// With a primary timeout set, a primary that does not answer in time counts
/// as a failure, leaving the rest of the caller's bound for the secondary.
pub struct FallbackProvider {
    primary: Arc<dyn SuggestionProvider>,
    secondary: Arc<dyn SuggestionProvider>,
    primary_timeout: Option<Duration>,
}

impl FallbackProvider {
    pub fn new(primary: Arc<dyn SuggestionProvider>, secondary: Arc<dyn SuggestionProvider>) -> Self {
        Self {
            primary,
            secondary,
            primary_timeout: None,
        }
    }

    /// Give up on the primary after `timeout`
    pub fn with_primary_timeout(mut self, timeout: Duration) -> Self {
        self.primary_timeout = Some(timeout);
        self
    }

    async fn ask_primary<T, F>(&self, fut: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match self.primary_timeout {
            Some(timeout) => tokio::time::timeout(timeout, fut)
                .await
                .unwrap_or(Err(ProviderError::Timeout(timeout))),
            None => fut.await,
        }
    }
}

#[async_trait]
impl SuggestionProvider for FallbackProvider {
    fn name(&self) -> &'static str {
        "Fallback"
    }

    async fn fetch_options(
        &self,
        level: &str,
        context: &SelectionContext,
    ) -> Result<Vec<String>, ProviderError> {
        match self.ask_primary(self.primary.fetch_options(level, context)).await {
            Ok(options) => Ok(options),
            Err(e) => {
                warn!(
                    level = %level,
                    primary = self.primary.name(),
                    secondary = self.secondary.name(),
                    error = %e,
                    "Primary provider failed, using secondary"
                );
                self.secondary.fetch_options(level, context).await
            }
        }
    }

    async fn fetch_identifier(&self, seed: &str) -> Result<String, ProviderError> {
        match self.ask_primary(self.primary.fetch_identifier(seed)).await {
            Ok(id) => Ok(id),
            Err(e) => {
                warn!(
                    primary = self.primary.name(),
                    error = %e,
                    "Identifier generation failed, using secondary"
                );
                self.secondary.fetch_identifier(seed).await
            }
        }
    }
}
