//! Engine state: the loaded configuration shared by every request.
//!
//! The engine holds no per-learner data. Courses, progress snapshots,
//! specification documents and candidate pools are passed in per call.

use tracing::{info, instrument};

use crate::config::{load_engine_config_from_env, EngineConfig};

#[derive(Clone, Debug, Default)]
pub struct Engine {
  pub config: EngineConfig,
}

impl Engine {
  /// Build from COURSEWARE_CONFIG_PATH when set, otherwise defaults.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Self {
    let config = load_engine_config_from_env().unwrap_or_default();
    Self::with_config(config)
  }

  pub fn with_config(config: EngineConfig) -> Self {
    info!(
      target: "courseware",
      locking_enabled = config.gating.locking_enabled,
      proficiency_threshold = config.gating.proficiency_threshold,
      allow_pass_through = config.selection.allow_pass_through,
      "Engine configured"
    );
    Self { config }
  }
}
