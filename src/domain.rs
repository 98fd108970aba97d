//! Domain models: the curriculum tree, learner progress, lock maps, parsed test
//! sections, and the candidate question pool.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// What kind of activity sits at a leaf of the curriculum tree?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
  Video,
  Article,
  Exercise,
  Quiz,
  UnitTest,
  CourseChallenge,
}

impl ActivityKind {
  /// Assessment kinds gate on a numeric score; the rest gate on `completed`.
  pub fn is_assessment(self) -> bool {
    matches!(
      self,
      ActivityKind::Exercise | ActivityKind::Quiz | ActivityKind::UnitTest | ActivityKind::CourseChallenge
    )
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
  pub id: String,
  pub kind: ActivityKind,
  #[serde(default)]
  pub ordering: i64,
}

impl Activity {
  pub fn new(id: impl Into<String>, kind: ActivityKind, ordering: i64) -> Self {
    Self { id: id.into(), kind, ordering }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
  pub id: String,
  #[serde(default)]
  pub activities: Vec<Activity>,
}

/// A unit interleaves lessons with unit-level quizzes and unit tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum UnitChild {
  Lesson(Lesson),
  Assessment(Activity),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
  pub id: String,
  #[serde(default)]
  pub children: Vec<UnitChild>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
  pub id: String,
  #[serde(default)]
  pub units: Vec<Unit>,
  /// Course-level challenges, always traversed after every unit.
  #[serde(default)]
  pub challenges: Vec<Activity>,
}

impl Course {
  /// Flatten the tree into its linear traversal order: units in order, each
  /// unit's children in stored order (lessons expanded in place), then the
  /// course challenges. Duplicate ids are kept as separate occurrences.
  pub fn traversal(&self) -> Vec<&Activity> {
    let mut out = Vec::new();
    for unit in &self.units {
      for child in &unit.children {
        match child {
          UnitChild::Lesson(lesson) => out.extend(lesson.activities.iter()),
          UnitChild::Assessment(activity) => out.push(activity),
        }
      }
    }
    out.extend(self.challenges.iter());
    out
  }
}

/// Mastery label reported by the analytics side. Carried through, never gated on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
  Attempted,
  Familiar,
  Proficient,
  Mastered,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
  #[serde(default)]
  pub completed: bool,
  /// 0..=100 when graded.
  #[serde(default)]
  pub score: Option<f64>,
  #[serde(default)]
  pub proficiency: Option<Proficiency>,
}

/// Per-learner progress keyed by activity id. Missing entries mean "not complete".
pub type ProgressSnapshot = HashMap<String, ProgressRecord>;

/// `true` = locked. Ordered by id so serialized maps are byte-stable.
pub type LockMap = BTreeMap<String, bool>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSection {
  pub identifier: Option<String>,
  #[serde(default)]
  pub shuffle: bool,
  #[serde(default)]
  pub select_count: Option<usize>,
  #[serde(default)]
  pub item_refs: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterminismParams {
  pub base_seed: String,
  #[serde(default)]
  pub attempt_number: Option<u64>,
}

impl DeterminismParams {
  pub fn new(base_seed: impl Into<String>, attempt_number: Option<u64>) -> Self {
    Self { base_seed: base_seed.into(), attempt_number }
  }
}

/// A resolved question, as delivered to the assessment-taking flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionRef {
  pub id: String,
  #[serde(default)]
  pub title: String,
  /// Opaque item body from the content service.
  #[serde(default)]
  pub payload: serde_json::Value,
}

/// Candidate questions for one assessment, in the order the content service
/// returned them. Lookups are by item identifier.
#[derive(Clone, Debug, Default)]
pub struct CandidatePool {
  items: Vec<QuestionRef>,
  by_id: HashMap<String, usize>,
}

impl CandidatePool {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a question; the first entry for an id wins.
  pub fn insert(&mut self, question: QuestionRef) {
    if self.by_id.contains_key(&question.id) {
      debug!(target: "selection", id = %question.id, "Duplicate candidate id ignored");
      return;
    }
    self.by_id.insert(question.id.clone(), self.items.len());
    self.items.push(question);
  }

  pub fn get(&self, id: &str) -> Option<&QuestionRef> {
    self.by_id.get(id).map(|&i| &self.items[i])
  }

  pub fn contains(&self, id: &str) -> bool {
    self.by_id.contains_key(id)
  }

  /// Identifiers in pool order.
  pub fn ids(&self) -> impl Iterator<Item = &str> {
    self.items.iter().map(|q| q.id.as_str())
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

impl FromIterator<QuestionRef> for CandidatePool {
  fn from_iter<I: IntoIterator<Item = QuestionRef>>(iter: I) -> Self {
    let mut pool = CandidatePool::new();
    for q in iter {
      pool.insert(q);
    }
    pool
  }
}
