//! Provider fetches and their completions
//!
//! A fetch runs as a spawned task and reports back over the engine's
//! completion channel. The engine applies completions one at a time; a
//! completion whose generation no longer matches its level is stale.

use crate::context::SelectionContext;
use crate::provider::{ProviderError, SuggestionProvider};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// What to ask the provider for
#[derive(Debug, Clone)]
pub(crate) enum FetchRequest {
    Options { level: String, context: SelectionContext },
    Identifier { seed: String },
}

/// Provider answer for one fetch
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Options(Result<Vec<String>, ProviderError>),
    Identifier {
        seed: String,
        result: Result<String, ProviderError>,
    },
}

/// Message posted back to the engine when a fetch finishes
#[derive(Debug, Clone)]
pub struct FetchCompletion {
    pub level_index: usize,
    pub generation: u64,
    pub outcome: FetchOutcome,
}

/// How the engine handled a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionDisposition {
    /// Provider result replaced the level's options
    Committed,
    /// Provider failed; empty options or a fallback identifier
    Degraded,
    /// Target level changed since the request; nothing applied
    Stale,
}

/// Bound `fut` by `timeout`, mapping expiry to `ProviderError::Timeout`
pub(crate) async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(timeout)),
    }
}

/// Spawn the provider call; the completion is sent on `tx`
pub(crate) fn spawn_fetch(
    provider: Arc<dyn SuggestionProvider>,
    request: FetchRequest,
    level_index: usize,
    generation: u64,
    timeout: Duration,
    tx: mpsc::UnboundedSender<FetchCompletion>,
) {
    tokio::spawn(async move {
        let outcome = match request {
            FetchRequest::Options { level, context } => {
                FetchOutcome::Options(bounded(timeout, provider.fetch_options(&level, &context)).await)
            }
            FetchRequest::Identifier { seed } => {
                let result = bounded(timeout, provider.fetch_identifier(&seed)).await;
                FetchOutcome::Identifier { seed, result }
            }
        };

        let completion = FetchCompletion {
            level_index,
            generation,
            outcome,
        };

        if tx.send(completion).is_err() {
            // Engine dropped while the fetch was running
            debug!(level_index, generation, "Completion receiver gone, dropping result");
        }
    });
}
