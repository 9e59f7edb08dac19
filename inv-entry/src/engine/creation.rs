//! Ad-hoc value creation with confirmation
//!
//! request → (UI confirms) → confirm | cancel. Nothing is committed until
//! confirmation; a confirmed value is appended to the level's options and
//! then selected exactly as if the user had picked it.

use super::{EngineError, SelectionEngine};
use chrono::Utc;
use inv_common::events::EntryEvent;
use tracing::{debug, info};

/// A proposed value awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCreation {
    pub level: String,
    pub value: String,
}

impl SelectionEngine {
    /// Propose `raw` as a new value for `level`
    ///
    /// Whitespace-only input is ignored (`Ok(None)`). A new request replaces
    /// any earlier pending one. Emits `CreationRequested` so the front end can
    /// ask for confirmation.
    pub fn request_create(
        &mut self,
        level: &str,
        raw: &str,
    ) -> Result<Option<PendingCreation>, EngineError> {
        let index = self.require_index(level)?;

        let value = raw.trim();
        if value.is_empty() {
            debug!(level = %level, "Ignoring empty creation request");
            return Ok(None);
        }

        if !self.dependency_satisfied(index) {
            return Err(self.disabled_error(index));
        }

        let pending = PendingCreation {
            level: level.to_string(),
            value: value.to_string(),
        };
        self.pending_creation = Some(pending.clone());

        self.event_bus.emit_lossy(EntryEvent::CreationRequested {
            level: pending.level.clone(),
            value: pending.value.clone(),
            timestamp: Utc::now(),
        });

        Ok(Some(pending))
    }

    /// Commit the pending value: append to options, then select it
    ///
    /// Duplicates are not checked; confirming an existing value adds a
    /// repeated entry. Returns the committed value.
    pub fn confirm_create(&mut self) -> Result<String, EngineError> {
        let pending = self
            .pending_creation
            .take()
            .ok_or(EngineError::NoPendingCreation)?;

        let index = self.require_index(&pending.level)?;

        // The ancestor may have been cleared while the prompt was open
        if !self.dependency_satisfied(index) {
            return Err(self.disabled_error(index));
        }

        self.options[index].push(pending.value.clone());
        // Any fetch still running for this level predates the user's edit
        self.generations[index] += 1;
        if self.loading == Some(index) {
            self.loading = None;
        }

        info!(level = %pending.level, value = %pending.value, "Created new option");
        self.event_bus.emit_lossy(EntryEvent::CreationConfirmed {
            level: pending.level.clone(),
            value: pending.value.clone(),
            timestamp: Utc::now(),
        });

        self.select_value(&pending.level, Some(pending.value.clone()))?;
        Ok(pending.value)
    }

    /// Drop the pending value without changing anything else
    pub fn cancel_create(&mut self) -> Option<PendingCreation> {
        let pending = self.pending_creation.take()?;

        debug!(level = %pending.level, value = %pending.value, "Creation cancelled");
        self.event_bus.emit_lossy(EntryEvent::CreationCancelled {
            level: pending.level.clone(),
            value: pending.value.clone(),
            timestamp: Utc::now(),
        });

        Some(pending)
    }
}
