//! Deterministic question selection.
//!
//! Per section, in document order:
//!   1) shuffle: seeded hash order when a base seed is given, otherwise an
//!      unseeded Fisher-Yates shuffle drawn from the injected RNG
//!   2) select N: a rotating window keyed by the attempt number when both seed
//!      and attempt are known, otherwise the first N
//!
//! With no sections at all the whole candidate pool passes through in pool
//! order. Output ids are then validated against the pool; see `assembly`.

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::{debug, error, instrument, warn};

use crate::assembly::assemble;
use crate::domain::{CandidatePool, DeterminismParams, QuestionRef, TestSection};
use crate::error::SelectionError;
use crate::util::fnv1a32;

/// Order `items` ascending by `fnv1a32("{seed}:{assessment}:{section}:{item}")`,
/// ties broken by item id. A pure function of its inputs.
pub fn seeded_order(base_seed: &str, assessment_id: &str, section_id: &str, items: &[String]) -> Vec<String> {
  let mut keyed: Vec<(u32, &String)> = items
    .iter()
    .map(|item| (fnv1a32(&format!("{base_seed}:{assessment_id}:{section_id}:{item}")), item))
    .collect();
  keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
  keyed.into_iter().map(|(_, item)| item.clone()).collect()
}

/// Take `min(count, len)` items starting at `(attempt * k) mod len`, wrapping.
/// Consecutive attempts advance the window by `k`.
pub fn rotating_window(items: &[String], count: usize, attempt: u64) -> Vec<String> {
  let n = items.len();
  if n == 0 {
    return Vec::new();
  }
  let k = count.min(n);
  let offset = ((attempt as u128 * k as u128) % n as u128) as usize;
  (0..k).map(|i| items[(offset + i) % n].clone()).collect()
}

/// Selects question ids for one attempt. The RNG only feeds the unseeded shuffle.
pub struct Selector<R: Rng> {
  rng: R,
}

impl Selector<StdRng> {
  pub fn from_entropy() -> Self {
    Self::new(StdRng::from_entropy())
  }
}

impl<R: Rng> Selector<R> {
  pub fn new(rng: R) -> Self {
    Self { rng }
  }

  /// Ordered questions for this attempt: `select_ids`, then every id is
  /// resolved against `candidates`. Any unresolved id fails the attempt.
  pub fn select(
    &mut self,
    assessment_id: &str,
    sections: &[TestSection],
    candidates: &CandidatePool,
    params: Option<&DeterminismParams>,
  ) -> Result<Vec<QuestionRef>, SelectionError> {
    let ids = self.select_ids(assessment_id, sections, candidates, params)?;
    assemble(&ids, candidates)
  }

  /// Ordered item ids for this attempt. Does not check them against the pool
  /// beyond pass-through; use [`Selector::select`] for resolved questions.
  #[instrument(level = "debug", skip(self, sections, candidates, params), fields(%assessment_id, sections = sections.len(), candidate_count = candidates.len(), seeded = params.is_some()))]
  pub fn select_ids(
    &mut self,
    assessment_id: &str,
    sections: &[TestSection],
    candidates: &CandidatePool,
    params: Option<&DeterminismParams>,
  ) -> Result<Vec<String>, SelectionError> {
    if sections.is_empty() {
      warn!(target: "selection", %assessment_id, candidate_count = candidates.len(), "No sections parsed; passing the whole candidate pool through");
      return Ok(candidates.ids().map(str::to_string).collect());
    }

    let mut out = Vec::new();
    for (index, section) in sections.iter().enumerate() {
      let picked = self.select_section(assessment_id, index, section, params)?;
      debug!(target: "selection", section_index = index, section = ?section.identifier, picked = picked.len(), "Section selected");
      out.extend(picked);
    }

    if out.is_empty() {
      error!(target: "selection", %assessment_id, section_count = sections.len(), "Sections contributed no questions");
      return Err(SelectionError::EmptySelection { section_count: sections.len() });
    }
    Ok(out)
  }

  fn select_section(
    &mut self,
    assessment_id: &str,
    index: usize,
    section: &TestSection,
    params: Option<&DeterminismParams>,
  ) -> Result<Vec<String>, SelectionError> {
    let mut items = section.item_refs.clone();

    if section.shuffle {
      let section_id = section.identifier.as_deref().filter(|s| !s.is_empty()).ok_or_else(|| {
        error!(target: "selection", section_index = index, "Shuffled section has no identifier to seed its order");
        SelectionError::MissingSectionIdentifier { section_index: index }
      })?;
      items = match params {
        Some(p) => seeded_order(&p.base_seed, assessment_id, section_id, &items),
        None => {
          items.shuffle(&mut self.rng);
          items
        }
      };
    }

    if let Some(count) = section.select_count.filter(|n| *n > 0) {
      items = match params.and_then(|p| p.attempt_number) {
        Some(attempt) if !items.is_empty() => rotating_window(&items, count, attempt),
        _ => items.into_iter().take(count).collect(),
      };
    }

    Ok(items)
  }
}
