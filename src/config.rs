//! Loading engine configuration (gating + selection policy) from TOML.
//!
//! Expected schema (every key optional):
//!
//! ```toml
//! [gating]
//! locking_enabled = true
//! proficiency_threshold = 80.0
//!
//! [selection]
//! allow_pass_through = true
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use crate::error::ConfigError;
use crate::gating::PROFICIENCY_THRESHOLD;

pub const CONFIG_PATH_ENV: &str = "COURSEWARE_CONFIG_PATH";

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct EngineConfig {
  #[serde(default)]
  pub gating: GatingConfig,
  #[serde(default)]
  pub selection: SelectionConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GatingConfig {
  #[serde(default = "default_true")]
  pub locking_enabled: bool,
  #[serde(default = "default_threshold")]
  pub proficiency_threshold: f64,
}

impl Default for GatingConfig {
  fn default() -> Self {
    Self { locking_enabled: true, proficiency_threshold: PROFICIENCY_THRESHOLD }
  }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SelectionConfig {
  /// Serve the whole candidate pool when a document has no sections.
  #[serde(default = "default_true")]
  pub allow_pass_through: bool,
}

impl Default for SelectionConfig {
  fn default() -> Self {
    Self { allow_pass_through: true }
  }
}

fn default_true() -> bool {
  true
}

fn default_threshold() -> f64 {
  PROFICIENCY_THRESHOLD
}

impl EngineConfig {
  pub fn from_toml_str(s: &str, path: &Path) -> Result<Self, ConfigError> {
    toml::from_str::<EngineConfig>(s).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    Self::from_toml_str(&raw, path)
  }
}

/// Attempt to load `EngineConfig` from COURSEWARE_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_engine_config_from_env() -> Option<EngineConfig> {
  let path = std::env::var(CONFIG_PATH_ENV).ok()?;
  match EngineConfig::load(&path) {
    Ok(cfg) => {
      info!(target: "courseware", %path, "Loaded engine config (TOML)");
      Some(cfg)
    }
    Err(e) => {
      error!(target: "courseware", %path, error = %e, "Failed to load engine config; using defaults");
      None
    }
  }
}
