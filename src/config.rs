//! Application configuration.
//!
//! Loaded from a JSON file (`$XDG_CONFIG_HOME/sizerd/config.json`).
//! Every field is optional — a minimal `{}` file is valid and all
//! sections fall back to their compiled-in defaults.  Unknown keys are
//! ignored so the schema can grow without breaking older files.
//!
//! # Example
//!
//! ```json
//! {
//!   "placement": { "settle_ms": 20, "max_attempts": 6 },
//!   "socket": { "path": "/run/user/1000/sizerd.sock" }
//! }
//! ```

use crate::placement::{PlacementEngine, DEFAULT_MAX_ATTEMPTS, DEFAULT_SETTLE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Placement verification loop settings.
    #[serde(default)]
    pub placement: PlacementConfig,

    /// Control socket settings.
    #[serde(default)]
    pub socket: SocketConfig,
}

/// Settings for the placement verification loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Delay before each verification check, in milliseconds.
    pub settle_ms: u64,
    /// How many verification checks to run before giving up.
    pub max_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            settle_ms: DEFAULT_SETTLE.as_millis() as u64,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PlacementConfig {
    /// Build the engine described by this config.
    pub fn engine(&self) -> PlacementEngine {
        PlacementEngine::new(Duration::from_millis(self.settle_ms), self.max_attempts)
    }
}

/// Settings for the control socket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocketConfig {
    /// Socket path override.  Defaults to `$XDG_RUNTIME_DIR/sizerd.sock`
    /// when absent.
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
