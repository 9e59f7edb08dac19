//! Completion tracking and the final submission payload

use super::SelectionEngine;
use crate::context::SelectionContext;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub selected: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent
    pub percent: u8,
}

/// Completed entry, ready to hand to whatever stores it
#[derive(Debug, Clone, Serialize)]
pub struct EntrySubmission {
    /// Level key → selected value, in hierarchy order
    pub hierarchy: SelectionContext,
    pub completed_at: DateTime<Utc>,
}

impl SelectionEngine {
    pub fn progress(&self) -> Progress {
        let total = self.selections.len();
        let selected = self.selections.iter().filter(|s| s.is_some()).count();
        let percent = if total == 0 {
            0
        } else {
            ((selected as f64 / total as f64) * 100.0).round() as u8
        };

        Progress {
            selected,
            total,
            percent,
        }
    }

    /// Every level has a selection
    pub fn is_complete(&self) -> bool {
        self.selections.iter().all(Option::is_some)
    }

    /// Payload for a complete entry; `None` while any level is unselected
    pub fn submission(&self) -> Option<EntrySubmission> {
        if !self.is_complete() {
            return None;
        }
        Some(EntrySubmission {
            hierarchy: self.selection_context(),
            completed_at: Utc::now(),
        })
    }
}
