//! Test Helper Utilities
//!
//! Shared utilities for testing inv-entry

#![allow(dead_code, unused_imports)]

pub mod engine_utils;
pub mod scripted_provider;

// Re-export commonly used items
pub use engine_utils::{drain_events, engine_with, select_path, BUILTIN_KEYS};
pub use scripted_provider::{ProviderCall, Script, ScriptedProvider};
