//! Type-ahead search over a level's options

use super::{EngineError, PendingCreation, SelectionEngine};

/// Filtered view of a level's options for a search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Options containing the term, case-insensitively, in option order
    pub matches: Vec<String>,
    /// First option equal to the term, ignoring case
    pub exact_match: Option<String>,
    /// Term is non-empty and matches no option exactly
    pub can_create: bool,
}

/// Result of submitting a search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    Selected(String),
    CreationRequested(PendingCreation),
    /// Empty term
    Ignored,
}

impl SelectionEngine {
    pub fn search(&self, level: &str, term: &str) -> Result<SearchResult, EngineError> {
        let options = self.options(level)?;
        let needle = term.trim().to_lowercase();

        let matches = options
            .iter()
            .filter(|opt| opt.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let exact_match = options
            .iter()
            .find(|opt| !needle.is_empty() && opt.to_lowercase() == needle)
            .cloned();

        Ok(SearchResult {
            matches,
            can_create: !needle.is_empty() && exact_match.is_none(),
            exact_match,
        })
    }

    /// Enter-key behaviour: pick the exact match, otherwise propose the term
    pub fn submit_search(&mut self, level: &str, term: &str) -> Result<SearchAction, EngineError> {
        let result = self.search(level, term)?;

        if let Some(value) = result.exact_match {
            self.select_value(level, Some(value.clone()))?;
            return Ok(SearchAction::Selected(value));
        }

        Ok(match self.request_create(level, term)? {
            Some(pending) => SearchAction::CreationRequested(pending),
            None => SearchAction::Ignored,
        })
    }
}
