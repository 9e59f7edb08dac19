//! inv-entry library interface
//!
//! Hierarchical selection engine for guided inventory entry, plus the
//! suggestion providers it consumes. The binary in `main.rs` wires these to
//! an interactive terminal session.

pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod hierarchy;
pub mod identifier;
pub mod provider;

pub use context::SelectionContext;
pub use engine::{EngineError, SelectionEngine};
pub use hierarchy::{Level, LevelHierarchy, LevelKind};
pub use provider::{ProviderError, SuggestionProvider};
