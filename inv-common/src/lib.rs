//! # Inventory Entry Common Library
//!
//! Shared code for the inventory entry workspace:
//! - Error types
//! - Bootstrap configuration loading (TOML)
//! - Entry event types and the EventBus

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
