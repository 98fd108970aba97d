//! Progression gating: which activities a learner may open right now.
//!
//! The course is flattened into its traversal order and walked once. Each
//! activity is locked unless the activity before it cleared its gate; the first
//! activity is always open. Missing or malformed progress never unlocks anything.

use tracing::{debug, info, instrument};

use crate::domain::{Activity, Course, LockMap, ProgressRecord, ProgressSnapshot};

/// Minimum score an assessment-kind activity needs to open the next activity.
pub const PROFICIENCY_THRESHOLD: f64 = 80.0;

/// Evaluate locks with the default proficiency threshold.
pub fn evaluate(course: &Course, progress: &ProgressSnapshot, locking_enabled: bool) -> LockMap {
  evaluate_with_threshold(course, progress, locking_enabled, PROFICIENCY_THRESHOLD)
}

#[instrument(level = "debug", skip(course, progress), fields(course = %course.id, progress_len = progress.len()))]
pub fn evaluate_with_threshold(
  course: &Course,
  progress: &ProgressSnapshot,
  locking_enabled: bool,
  threshold: f64,
) -> LockMap {
  let traversal = course.traversal();
  let mut locks = LockMap::new();

  if !locking_enabled {
    for activity in &traversal {
      locks.insert(activity.id.clone(), false);
    }
    info!(target: "gating", course = %course.id, activities = traversal.len(), locked = 0, locking_enabled = false, "Lock map evaluated");
    return locks;
  }

  let mut previous_complete = true;
  for activity in &traversal {
    // Same id at two positions: the later occurrence overwrites the earlier one.
    if let Some(prev) = locks.insert(activity.id.clone(), !previous_complete) {
      debug!(target: "gating", id = %activity.id, previous_lock = prev, lock = !previous_complete, "Duplicate activity occurrence overwrote lock");
    }
    previous_complete = gating_complete(activity, progress.get(&activity.id), threshold);
  }

  let locked = locks.values().filter(|l| **l).count();
  info!(target: "gating", course = %course.id, activities = traversal.len(), locked, locking_enabled = true, "Lock map evaluated");
  locks
}

/// Did this activity clear its gate? Assessments need a numeric score at or
/// above `threshold` (the `completed` flag is ignored); videos and articles need
/// `completed`. No record means no.
pub fn gating_complete(activity: &Activity, record: Option<&ProgressRecord>, threshold: f64) -> bool {
  let Some(record) = record else {
    return false;
  };
  if activity.kind.is_assessment() {
    matches!(record.score, Some(score) if score >= threshold)
  } else {
    record.completed
  }
}
