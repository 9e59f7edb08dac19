//! Hierarchical selection engine
//!
//! Owns the per-level selection, the per-level option lists, the single
//! loading marker and the pending creation. All mutation goes through
//! `&mut self`; provider calls run as spawned tasks and come back as
//! [`FetchCompletion`] messages that the owner applies in arrival order
//! (see [`SelectionEngine::process_next`] and [`SelectionEngine::settle`]).
//!
//! # Invariants
//! - A selected level always has a selected dependency. Changing or clearing a
//!   level clears every level after it, selections and options alike.
//! - At most one level is marked loading.
//! - Every level carries a generation counter, bumped whenever the level is
//!   invalidated or re-fetched. A completion carrying an old generation is
//!   discarded.
//!
//! # Example
//! ```rust,ignore
//! let mut engine = SelectionEngine::new(hierarchy, provider);
//! engine.load_root_options();
//! engine.settle().await;
//!
//! engine.select_value("catalog", Some("Electronics".to_string()))?;
//! engine.settle().await;
//! assert!(!engine.options("category")?.is_empty());
//! ```

mod creation;
mod fetch;
mod progress;
mod search;

pub use creation::PendingCreation;
pub use fetch::{CompletionDisposition, FetchCompletion, FetchOutcome};
pub use progress::{EntrySubmission, Progress};
pub use search::{SearchAction, SearchResult};

use crate::context::SelectionContext;
use crate::hierarchy::{LevelHierarchy, LevelKind};
use crate::identifier::fallback_identifier;
use crate::provider::SuggestionProvider;
use chrono::Utc;
use fetch::{spawn_fetch, FetchRequest};
use inv_common::config::DEFAULT_TIMEOUT_MS;
use inv_common::events::{EntryEvent, EventBus};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Engine call rejected before any state change
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Level key is not part of the configured hierarchy
    #[error("Unknown level: {0}")]
    UnknownLevel(String),

    /// Level cannot take a value while its dependency is unselected
    #[error("Level '{level}' is disabled until '{dependency}' is selected")]
    LevelDisabled { level: String, dependency: String },

    /// confirm_create called with nothing pending
    #[error("No pending creation to confirm")]
    NoPendingCreation,
}

pub struct SelectionEngine {
    hierarchy: Arc<LevelHierarchy>,
    provider: Arc<dyn SuggestionProvider>,
    fetch_timeout: Duration,
    event_bus: EventBus,

    selections: Vec<Option<String>>,
    options: Vec<Vec<String>>,
    generations: Vec<u64>,
    loading: Option<usize>,
    pending_creation: Option<PendingCreation>,

    in_flight: usize,
    completion_tx: mpsc::UnboundedSender<FetchCompletion>,
    completion_rx: mpsc::UnboundedReceiver<FetchCompletion>,
}

impl SelectionEngine {
    /// Create an engine with every level unselected and no options
    pub fn new(hierarchy: Arc<LevelHierarchy>, provider: Arc<dyn SuggestionProvider>) -> Self {
        let len = hierarchy.len();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Self {
            hierarchy,
            provider,
            fetch_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            event_bus: EventBus::default(),
            selections: vec![None; len],
            options: vec![Vec::new(); len],
            generations: vec![0; len],
            loading: None,
            pending_creation: None,
            in_flight: 0,
            completion_tx,
            completion_rx,
        }
    }

    /// Bound applied to every provider call
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = event_bus;
        self
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn hierarchy(&self) -> &LevelHierarchy {
        &self.hierarchy
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    pub fn selection(&self, level: &str) -> Result<Option<&str>, EngineError> {
        let index = self.require_index(level)?;
        Ok(self.selections[index].as_deref())
    }

    pub fn options(&self, level: &str) -> Result<&[String], EngineError> {
        let index = self.require_index(level)?;
        Ok(&self.options[index])
    }

    /// Key of the level currently loading, if any
    pub fn loading_level(&self) -> Option<&str> {
        self.loading.map(|i| self.hierarchy.levels()[i].key.as_str())
    }

    pub fn is_loading(&self, level: &str) -> bool {
        self.loading_level() == Some(level)
    }

    pub fn pending_creation(&self) -> Option<&PendingCreation> {
        self.pending_creation.as_ref()
    }

    /// Snapshot of every level's current selection
    pub fn selection_context(&self) -> SelectionContext {
        SelectionContext::new(
            self.hierarchy
                .keys()
                .zip(&self.selections)
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        )
    }

    /// A level is enabled when it has no dependency or its dependency is selected
    pub fn is_enabled(&self, level: &str) -> Result<bool, EngineError> {
        let index = self.require_index(level)?;
        Ok(self.dependency_satisfied(index))
    }

    /// Generation counter for a level
    pub fn generation(&self, level: &str) -> Result<u64, EngineError> {
        let index = self.require_index(level)?;
        Ok(self.generations[index])
    }

    /// Number of fetches issued whose completion has not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Fetch the first level's options with an all-unselected context
    pub fn load_root_options(&mut self) {
        let level = self.hierarchy.first().key.clone();
        let context = SelectionContext::unselected(self.hierarchy.keys());
        self.begin_fetch(0, FetchRequest::Options { level, context });
    }

    /// Set or clear the selection at `level`
    ///
    /// Clearing drops every downstream selection and option list without
    /// fetching. Setting a value does the same, then issues exactly one fetch
    /// for the next level (if any) scoped to the context as it stands after
    /// this selection.
    pub fn select_value(&mut self, level: &str, value: Option<String>) -> Result<(), EngineError> {
        let index = self.require_index(level)?;

        if value.is_some() && !self.dependency_satisfied(index) {
            return Err(self.disabled_error(index));
        }

        // Request context is built from the state before the update plus the
        // new value; downstream levels are about to be cleared, so they are None.
        let request = value
            .as_ref()
            .and_then(|value| self.next_level_request(index, value));

        self.selections[index] = value.clone();
        let cleared = self.invalidate_downstream(index);

        debug!(level = %level, value = ?value, cleared = cleared.len(), "Selection changed");
        self.event_bus.emit_lossy(EntryEvent::SelectionChanged {
            level: level.to_string(),
            value,
            cleared_downstream: cleared,
            timestamp: Utc::now(),
        });

        if let Some(request) = request {
            self.begin_fetch(index + 1, request);
        }

        Ok(())
    }

    /// Restart the form
    ///
    /// Every level unselected; every option list except the first level's
    /// cleared; pending creation and loading marker cleared.
    pub fn reset(&mut self) {
        for index in 0..self.selections.len() {
            self.selections[index] = None;
            if index > 0 {
                self.options[index].clear();
                self.generations[index] += 1;
            }
        }
        self.pending_creation = None;
        self.loading = None;

        info!("Entry form reset");
        self.event_bus.emit_lossy(EntryEvent::FormReset {
            timestamp: Utc::now(),
        });
    }

    // ------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------

    /// Wait for the next fetch completion; `None` when nothing is in flight
    pub async fn next_completion(&mut self) -> Option<FetchCompletion> {
        if self.in_flight == 0 {
            return None;
        }
        self.completion_rx.recv().await
    }

    /// Wait for and apply the next completion
    pub async fn process_next(&mut self) -> Option<CompletionDisposition> {
        let completion = self.next_completion().await?;
        Some(self.apply_completion(completion))
    }

    /// Apply completions until nothing is in flight
    pub async fn settle(&mut self) {
        while self.process_next().await.is_some() {}
    }

    /// Apply every completion that has already arrived, without waiting
    pub fn process_ready(&mut self) -> usize {
        let mut applied = 0;
        while self.in_flight > 0 {
            match self.completion_rx.try_recv() {
                Ok(completion) => {
                    self.apply_completion(completion);
                    applied += 1;
                }
                Err(_) => break,
            }
        }
        applied
    }

    /// Commit, degrade or discard one completion
    pub fn apply_completion(&mut self, completion: FetchCompletion) -> CompletionDisposition {
        self.in_flight = self.in_flight.saturating_sub(1);

        let FetchCompletion {
            level_index,
            generation,
            outcome,
        } = completion;

        let Some(level) = self.hierarchy.at(level_index).map(|l| l.key.clone()) else {
            warn!(level_index, "Completion for a level outside the hierarchy");
            return CompletionDisposition::Stale;
        };

        let current_generation = self.generations[level_index];
        if generation != current_generation {
            debug!(
                level = %level,
                generation,
                current_generation,
                "Discarding stale response"
            );
            self.event_bus.emit_lossy(EntryEvent::StaleResponseDiscarded {
                level,
                generation,
                current_generation,
                timestamp: Utc::now(),
            });
            return CompletionDisposition::Stale;
        }

        if self.loading == Some(level_index) {
            self.loading = None;
        }

        match outcome {
            FetchOutcome::Options(Ok(options)) => {
                debug!(level = %level, count = options.len(), "Options committed");
                self.event_bus.emit_lossy(EntryEvent::OptionsLoaded {
                    level,
                    count: options.len(),
                    timestamp: Utc::now(),
                });
                self.options[level_index] = options;
                CompletionDisposition::Committed
            }
            FetchOutcome::Options(Err(e)) => {
                warn!(level = %level, error = %e, "Suggestion fetch failed, no options available");
                self.options[level_index].clear();
                self.event_bus.emit_lossy(EntryEvent::FetchFailed {
                    level,
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
                CompletionDisposition::Degraded
            }
            FetchOutcome::Identifier { result: Ok(id), .. } => {
                debug!(level = %level, identifier = %id, "Identifier committed");
                self.options[level_index] = vec![id];
                self.event_bus.emit_lossy(EntryEvent::OptionsLoaded {
                    level,
                    count: 1,
                    timestamp: Utc::now(),
                });
                CompletionDisposition::Committed
            }
            FetchOutcome::Identifier { seed, result: Err(e) } => {
                let id = fallback_identifier(&seed);
                warn!(
                    level = %level,
                    error = %e,
                    fallback = %id,
                    "Identifier generation failed, using fallback"
                );
                self.options[level_index] = vec![id];
                self.event_bus.emit_lossy(EntryEvent::FetchFailed {
                    level,
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
                CompletionDisposition::Degraded
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn require_index(&self, level: &str) -> Result<usize, EngineError> {
        self.hierarchy
            .index_of(level)
            .ok_or_else(|| EngineError::UnknownLevel(level.to_string()))
    }

    fn dependency_satisfied(&self, index: usize) -> bool {
        index == 0 || self.selections[index - 1].is_some()
    }

    fn disabled_error(&self, index: usize) -> EngineError {
        let levels = self.hierarchy.levels();
        EngineError::LevelDisabled {
            level: levels[index].key.clone(),
            dependency: levels[index - 1].key.clone(),
        }
    }

    /// Request for the level after `index`, given `value` is being set at `index`
    fn next_level_request(&self, index: usize, value: &str) -> Option<FetchRequest> {
        let next = self.hierarchy.at(index + 1)?;

        let context = SelectionContext::new(
            self.hierarchy
                .levels()
                .iter()
                .enumerate()
                .map(|(i, level)| {
                    let selected = match i.cmp(&index) {
                        std::cmp::Ordering::Less => self.selections[i].clone(),
                        std::cmp::Ordering::Equal => Some(value.to_string()),
                        std::cmp::Ordering::Greater => None,
                    };
                    (level.key.clone(), selected)
                })
                .collect(),
        );

        Some(match next.kind {
            LevelKind::Suggested => FetchRequest::Options {
                level: next.key.clone(),
                context,
            },
            LevelKind::Identifier => {
                let seed = next
                    .seed_from
                    .as_deref()
                    .and_then(|key| context.get(key))
                    .unwrap_or(value)
                    .to_string();
                FetchRequest::Identifier { seed }
            }
        })
    }

    /// Clear selections and options after `index`; returns the cleared keys
    fn invalidate_downstream(&mut self, index: usize) -> Vec<String> {
        let mut cleared = Vec::new();
        for i in index + 1..self.selections.len() {
            self.selections[i] = None;
            self.options[i].clear();
            self.generations[i] += 1;
            if self.loading == Some(i) {
                self.loading = None;
            }
            cleared.push(self.hierarchy.levels()[i].key.clone());
        }
        cleared
    }

    fn begin_fetch(&mut self, index: usize, request: FetchRequest) {
        self.generations[index] += 1;
        let generation = self.generations[index];
        self.loading = Some(index);
        self.in_flight += 1;

        let level = self.hierarchy.levels()[index].key.clone();
        debug!(
            level = %level,
            generation,
            provider = self.provider.name(),
            "Fetch issued"
        );
        self.event_bus.emit_lossy(EntryEvent::OptionsLoading {
            level,
            generation,
            timestamp: Utc::now(),
        });

        spawn_fetch(
            Arc::clone(&self.provider),
            request,
            index,
            generation,
            self.fetch_timeout,
            self.completion_tx.clone(),
        );
    }
}
