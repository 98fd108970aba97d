//! Shared fixtures for unit tests.

use crate::domain::{
  Activity, ActivityKind, CandidatePool, Course, Lesson, ProgressRecord, QuestionRef, Unit, UnitChild,
};

pub fn activity(id: &str, kind: ActivityKind) -> Activity {
  Activity::new(id, kind, 0)
}

/// A single unit holding one lesson with `activities`.
pub fn course_of(activities: Vec<Activity>) -> Course {
  Course {
    id: "course".into(),
    units: vec![Unit {
      id: "unit".into(),
      children: vec![UnitChild::Lesson(Lesson { id: "lesson".into(), activities })],
    }],
    challenges: vec![],
  }
}

/// Two units with unit-level assessments and one course challenge.
/// Traversal: v1 a1 e1 q1 v2 e2 t1 cc1.
pub fn sample_course() -> Course {
  Course {
    id: "algebra".into(),
    units: vec![
      Unit {
        id: "u1".into(),
        children: vec![
          UnitChild::Lesson(Lesson {
            id: "l1".into(),
            activities: vec![
              Activity::new("v1", ActivityKind::Video, 1),
              Activity::new("a1", ActivityKind::Article, 2),
              Activity::new("e1", ActivityKind::Exercise, 3),
            ],
          }),
          UnitChild::Assessment(Activity::new("q1", ActivityKind::Quiz, 4)),
        ],
      },
      Unit {
        id: "u2".into(),
        children: vec![
          UnitChild::Lesson(Lesson {
            id: "l2".into(),
            activities: vec![
              Activity::new("v2", ActivityKind::Video, 1),
              Activity::new("e2", ActivityKind::Exercise, 2),
            ],
          }),
          UnitChild::Assessment(Activity::new("t1", ActivityKind::UnitTest, 3)),
        ],
      },
    ],
    challenges: vec![Activity::new("cc1", ActivityKind::CourseChallenge, 1)],
  }
}

pub fn completed() -> ProgressRecord {
  ProgressRecord { completed: true, score: None, proficiency: None }
}

pub fn scored(score: f64) -> ProgressRecord {
  ProgressRecord { completed: false, score: Some(score), proficiency: None }
}

pub fn question(id: &str) -> QuestionRef {
  QuestionRef { id: id.into(), title: format!("Question {id}"), payload: serde_json::json!({ "ref": id }) }
}

pub fn pool_of(ids: &[&str]) -> CandidatePool {
  ids.iter().map(|id| question(id)).collect()
}

/// QTI 3 test with one shuffled "pick 3 of 6" section.
pub const SHUFFLED_PICK_THREE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<qti-assessment-test identifier="unit-test-1" title="Unit test">
  <qti-test-part identifier="part-1" navigation-mode="linear" submission-mode="individual">
    <qti-assessment-section identifier="sec-a" title="Section A" visible="true">
      <qti-ordering shuffle="true"/>
      <qti-selection select="3"/>
      <qti-assessment-item-ref identifier="a" href="items/a.xml"/>
      <qti-assessment-item-ref identifier="b" href="items/b.xml"/>
      <qti-assessment-item-ref identifier="c" href="items/c.xml"/>
      <qti-assessment-item-ref identifier="d" href="items/d.xml"/>
      <qti-assessment-item-ref identifier="e" href="items/e.xml"/>
      <qti-assessment-item-ref identifier="f" href="items/f.xml"/>
    </qti-assessment-section>
  </qti-test-part>
</qti-assessment-test>
"#;
