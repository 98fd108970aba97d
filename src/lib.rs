//! Courseware core · progression gating and assessment question selection
//!
//! - Lock evaluation over a course tree (course → unit → lesson → activity)
//! - QTI-style test specification parsing
//! - Seeded, attempt-rotating question selection with strict pool validation
//!
//! Everything here is a pure, synchronous library call; the host owns
//! persistence and transport.
//!
//! Important env variables:
//!   COURSEWARE_CONFIG_PATH : path to TOML config (gating + selection policy)
//!   LOG_LEVEL              : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT             : "pretty" (default) or "json"

pub mod assembly;
pub mod config;
pub mod domain;
pub mod error;
pub mod gating;
pub mod logic;
pub mod sections;
pub mod selection;
pub mod state;
pub mod telemetry;
pub mod util;

#[cfg(test)]
mod testutil;

pub use config::EngineConfig;
pub use domain::{
  Activity, ActivityKind, CandidatePool, Course, DeterminismParams, Lesson, LockMap, Proficiency, ProgressRecord,
  ProgressSnapshot, QuestionRef, TestSection, Unit, UnitChild,
};
pub use error::{ConfigError, SelectionError};
pub use gating::{evaluate, PROFICIENCY_THRESHOLD};
pub use logic::{lock_map, start_assessment};
pub use sections::{parse_document, parse_sections, ParseWarning, TestDocument};
pub use selection::Selector;
pub use state::Engine;
