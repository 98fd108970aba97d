//! Resolve selected ids into the questions the learner will see.

use tracing::{error, instrument};

use crate::domain::{CandidatePool, QuestionRef};
use crate::error::SelectionError;

/// Map each id to its candidate, keeping the selected order. Any id the pool
/// cannot resolve fails the whole attempt; the error lists every missing id.
#[instrument(level = "debug", skip(ids, candidates), fields(selected = ids.len(), candidate_count = candidates.len()))]
pub fn assemble(ids: &[String], candidates: &CandidatePool) -> Result<Vec<QuestionRef>, SelectionError> {
  let missing: Vec<String> = ids.iter().filter(|id| !candidates.contains(id)).cloned().collect();
  if !missing.is_empty() {
    error!(target: "selection", missing = ?missing, "Selected items missing from candidate pool");
    return Err(SelectionError::DataIntegrity { missing });
  }
  Ok(ids.iter().filter_map(|id| candidates.get(id).cloned()).collect())
}
