//! Error types for the assessment pipeline and configuration loading.
//!
//! Lock evaluation has no error type: every missing or malformed progress input
//! degrades to "not complete".

use std::path::PathBuf;

/// Fatal failures while building the question list for an attempt.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
  /// A shuffled section has nothing to seed its ordering with.
  #[error("section #{section_index} requests shuffle but has no identifier")]
  MissingSectionIdentifier { section_index: usize },

  /// Selected identifiers that the candidate pool cannot resolve.
  #[error("{} selected item(s) missing from candidate pool: {}", .missing.len(), .missing.join(", "))]
  DataIntegrity { missing: Vec<String> },

  /// Sections were parsed but none contributed an item.
  #[error("{section_count} section(s) produced no questions")]
  EmptySelection { section_count: usize },

  /// The document had no sections and the engine is configured to refuse pass-through.
  #[error("specification has no sections and pass-through is disabled")]
  PassThroughDisabled,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}
