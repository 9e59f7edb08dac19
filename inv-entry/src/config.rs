//! Engine assembly from bootstrap configuration
//!
//! Priority for provider settings: command line → TOML file → compiled
//! defaults. File resolution itself lives in `inv_common::config`.

use crate::engine::SelectionEngine;
use crate::hierarchy::LevelHierarchy;
use crate::provider::{build_provider, call_timeout};
use inv_common::config::{ProviderMode, TomlConfig};
use inv_common::events::EventBus;
use inv_common::{Error, Result};
use std::sync::Arc;
use tracing::info;

/// Command-line overrides for the TOML values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub offline: bool,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// Apply command-line overrides on top of the loaded file
pub fn apply_overrides(config: &mut TomlConfig, overrides: &ConfigOverrides) -> Result<()> {
    if overrides.offline {
        config.provider.mode = ProviderMode::Offline;
    }
    if let Some(base_url) = &overrides.base_url {
        if base_url.trim().is_empty() {
            return Err(Error::InvalidInput("--base-url must not be empty".to_string()));
        }
        config.provider.base_url = base_url.clone();
    }
    if let Some(timeout_ms) = overrides.timeout_ms {
        if timeout_ms == 0 {
            return Err(Error::InvalidInput("--timeout-ms must be greater than zero".to_string()));
        }
        config.provider.timeout_ms = timeout_ms;
    }
    Ok(())
}

/// Validate the hierarchy, build the provider and assemble the engine
///
/// A malformed hierarchy is fatal here, before any user interaction.
pub fn build_engine(config: &TomlConfig, event_bus: EventBus) -> Result<SelectionEngine> {
    let hierarchy = Arc::new(LevelHierarchy::from_config(&config.levels)?);
    let provider = build_provider(&config.provider)
        .map_err(|e| Error::Config(format!("Provider setup failed: {}", e)))?;

    info!(
        levels = hierarchy.len(),
        provider = provider.name(),
        timeout_ms = config.provider.timeout_ms,
        "Selection engine configured"
    );

    Ok(SelectionEngine::new(hierarchy, provider)
        .with_fetch_timeout(call_timeout(&config.provider))
        .with_event_bus(event_bus))
}
