//! Bootstrap configuration loading and config file resolution
//!
//! The bootstrap file is TOML and entirely optional. A missing file means
//! "use compiled defaults"; a file that exists but does not parse is fatal.
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [provider]
//! mode = "http-with-fallback"
//! base_url = "https://api.example.com"
//! timeout_ms = 3000
//!
//! [provider.endpoints]
//! catalog = "/catalogs"
//!
//! [[levels]]
//! key = "catalog"
//! label = "Catalog"
//! placeholder = "Select or create a catalog..."
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "INV_ENTRY_CONFIG";

/// Default provider request bound in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Suggestion provider configuration (optional)
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Level hierarchy override
    ///
    /// Empty means the built-in catalog → identifier hierarchy.
    #[serde(default)]
    pub levels: Vec<LevelConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Where suggestions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderMode {
    /// Remote HTTP suggestion service only
    Http,
    /// Built-in suggestion tables only
    Offline,
    /// Remote service, built-in tables when the service fails
    HttpWithFallback,
}

/// Suggestion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_mode")]
    pub mode: ProviderMode,

    /// Base URL of the suggestion service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request bound, enforced by both the HTTP client and the engine
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Level key → request path
    #[serde(default = "default_endpoints")]
    pub endpoints: BTreeMap<String, String>,

    /// Request path for identifier generation
    #[serde(default = "default_identifier_endpoint")]
    pub identifier_endpoint: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            endpoints: default_endpoints(),
            identifier_endpoint: default_identifier_endpoint(),
        }
    }
}

/// One level of the hierarchy as written in the config file
///
/// Validation (chain shape, identifier placement) happens when the hierarchy
/// is built, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub depends_on: Option<String>,
    /// "suggested" (default) or "identifier"
    #[serde(default)]
    pub kind: LevelKindConfig,
    /// Identifier levels only: level whose value seeds generation
    #[serde(default)]
    pub seed_from: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LevelKindConfig {
    #[default]
    Suggested,
    Identifier,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_mode() -> ProviderMode {
    ProviderMode::HttpWithFallback
}

fn default_base_url() -> String {
    "https://api.white-space.io".to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_endpoints() -> BTreeMap<String, String> {
    [
        ("catalog", "/catalogs"),
        ("category", "/categories"),
        ("subCategory", "/sub_categories"),
        ("brand", "/brands"),
        ("model", "/models"),
        ("year", "/years"),
        ("color", "/colors"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_identifier_endpoint() -> String {
    "/utils/generate-uuid".to_string()
}

/// Config file resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. Platform config directory (`<config_dir>/inv-entry/config.toml`) if present
///
/// Returns `None` when nothing applies; callers then use compiled defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: platform config directory
    default_config_path().filter(|path| path.exists())
}

/// Platform config file location (may not exist)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("inv-entry").join("config.toml"))
}

/// Load bootstrap configuration
///
/// - `None` path: compiled defaults
/// - Path that does not exist: warning + compiled defaults
/// - Path that exists but cannot be read or parsed: error
pub fn load_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        info!("No config file configured, using compiled defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Config file not found: {}, using compiled defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse bootstrap configuration from TOML text
pub fn parse_config(content: &str) -> Result<TomlConfig> {
    let config: TomlConfig = toml::from_str(content)?;

    if config.provider.timeout_ms == 0 {
        return Err(Error::Config(
            "provider.timeout_ms must be greater than zero".to_string(),
        ));
    }

    Ok(config)
}
