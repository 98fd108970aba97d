//! Request-level operations for the host application.
//!
//! This includes:
//!   - Lock maps for a learner's view of a course
//!   - Starting an assessment attempt: parse, then select and resolve

use rand::Rng;
use tracing::{error, info, instrument};

use crate::domain::{CandidatePool, Course, DeterminismParams, LockMap, ProgressSnapshot, QuestionRef};
use crate::error::SelectionError;
use crate::gating::evaluate_with_threshold;
use crate::sections::parse_document;
use crate::selection::Selector;
use crate::state::Engine;

#[instrument(level = "info", skip(engine, course, progress), fields(course = %course.id))]
pub fn lock_map(engine: &Engine, course: &Course, progress: &ProgressSnapshot) -> LockMap {
  let gating = &engine.config.gating;
  evaluate_with_threshold(course, progress, gating.locking_enabled, gating.proficiency_threshold)
}

/// Build the ordered question list for one attempt. `rng` is only drawn from
/// when a shuffled section is selected without `params`.
#[instrument(level = "info", skip(engine, spec_text, candidates, params, rng), fields(%assessment_id, spec_len = spec_text.len(), candidate_count = candidates.len()))]
pub fn start_assessment<R: Rng>(
  engine: &Engine,
  assessment_id: &str,
  spec_text: &str,
  candidates: &CandidatePool,
  params: Option<&DeterminismParams>,
  rng: R,
) -> Result<Vec<QuestionRef>, SelectionError> {
  let doc = parse_document(spec_text)?;

  if doc.sections.is_empty() && !engine.config.selection.allow_pass_through {
    error!(target: "selection", %assessment_id, "Specification has no sections and pass-through is disabled");
    return Err(SelectionError::PassThroughDisabled);
  }

  let questions = Selector::new(rng).select(assessment_id, &doc.sections, candidates, params)?;

  info!(
    target: "selection",
    %assessment_id,
    sections = doc.sections.len(),
    warnings = doc.warnings.len(),
    questions = questions.len(),
    attempt = ?params.and_then(|p| p.attempt_number),
    "Assessment attempt assembled"
  );
  Ok(questions)
}

#[cfg(test)]
mod tests {
  use rand::{rngs::StdRng, SeedableRng};

  use super::*;
  use crate::config::{EngineConfig, GatingConfig, SelectionConfig};
  use crate::domain::ActivityKind;
  use crate::testutil::{activity, course_of, pool_of, scored, SHUFFLED_PICK_THREE};

  fn rng() -> StdRng {
    StdRng::seed_from_u64(11)
  }

  fn question_ids(questions: &[QuestionRef]) -> Vec<&str> {
    questions.iter().map(|q| q.id.as_str()).collect()
  }

  #[test]
  fn lock_map_uses_engine_threshold() {
    let course = course_of(vec![activity("e", ActivityKind::Exercise), activity("v", ActivityKind::Video)]);
    let mut progress = ProgressSnapshot::new();
    progress.insert("e".into(), scored(70.0));

    let strict = Engine::default();
    assert!(lock_map(&strict, &course, &progress)["v"]);

    let lenient = Engine::with_config(EngineConfig {
      gating: GatingConfig { locking_enabled: true, proficiency_threshold: 70.0 },
      ..EngineConfig::default()
    });
    assert!(!lock_map(&lenient, &course, &progress)["v"]);
  }

  #[test]
  fn lock_map_respects_disabled_locking() {
    let course = course_of(vec![activity("a", ActivityKind::Video), activity("b", ActivityKind::Quiz)]);
    let engine = Engine::with_config(EngineConfig {
      gating: GatingConfig { locking_enabled: false, proficiency_threshold: 80.0 },
      ..EngineConfig::default()
    });
    assert!(lock_map(&engine, &course, &ProgressSnapshot::new()).values().all(|l| !l));
  }

  #[test]
  fn start_assessment_is_reproducible_per_attempt() {
    let engine = Engine::default();
    let pool = pool_of(&["a", "b", "c", "d", "e", "f"]);
    let params = DeterminismParams::new("u1", Some(0));
    let first = start_assessment(&engine, "unit-test-1", SHUFFLED_PICK_THREE, &pool, Some(&params), rng()).expect("first");
    let again = start_assessment(&engine, "unit-test-1", SHUFFLED_PICK_THREE, &pool, Some(&params), StdRng::seed_from_u64(3))
      .expect("again");
    assert_eq!(first, again);
    assert_eq!(first.len(), 3);

    let next = DeterminismParams::new("u1", Some(1));
    let second = start_assessment(&engine, "unit-test-1", SHUFFLED_PICK_THREE, &pool, Some(&next), rng()).expect("second");
    assert!(question_ids(&second).iter().all(|id| !question_ids(&first).contains(id)));
  }

  #[test]
  fn missing_candidate_aborts_the_attempt() {
    let engine = Engine::default();
    let pool = pool_of(&["a", "b", "c", "d", "e"]);
    let text = r#"<assessmentSection identifier="s">
      <assessmentItemRef identifier="a"/><assessmentItemRef identifier="b"/><assessmentItemRef identifier="c"/>
      <assessmentItemRef identifier="d"/><assessmentItemRef identifier="e"/><assessmentItemRef identifier="f"/>
    </assessmentSection>"#;
    let err = start_assessment(&engine, "t", text, &pool, None, rng()).unwrap_err();
    assert!(matches!(err, SelectionError::DataIntegrity { ref missing } if missing == &vec!["f".to_string()]));
  }

  #[test]
  fn sectionless_document_passes_through_in_pool_order() {
    let engine = Engine::default();
    let pool = pool_of(&["q3", "q1", "q4", "q2"]);
    let params = DeterminismParams::new("seed", Some(9));
    let out = start_assessment(&engine, "legacy", "<assessmentTest identifier=\"legacy\"/>", &pool, Some(&params), rng())
      .expect("pass-through");
    assert_eq!(question_ids(&out), vec!["q3", "q1", "q4", "q2"]);
  }

  #[test]
  fn pass_through_can_be_disabled() {
    let engine = Engine::with_config(EngineConfig {
      selection: SelectionConfig { allow_pass_through: false },
      ..EngineConfig::default()
    });
    let err = start_assessment(&engine, "legacy", "", &pool_of(&["q1"]), None, rng()).unwrap_err();
    assert!(matches!(err, SelectionError::PassThroughDisabled));
  }

  #[test]
  fn shuffled_section_without_identifier_aborts() {
    let text = r#"<assessmentSection><ordering shuffle="true"/><assessmentItemRef identifier="a"/></assessmentSection>"#;
    let err = start_assessment(&Engine::default(), "t", text, &pool_of(&["a"]), None, rng()).unwrap_err();
    assert!(matches!(err, SelectionError::MissingSectionIdentifier { section_index: 0 }));
  }

  #[test]
  fn empty_sections_abort() {
    let text = r#"<assessmentSection identifier="s"></assessmentSection>"#;
    let err = start_assessment(&Engine::default(), "t", text, &pool_of(&["a"]), None, rng()).unwrap_err();
    assert!(matches!(err, SelectionError::EmptySelection { section_count: 1 }));
  }
}
