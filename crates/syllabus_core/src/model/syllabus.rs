//! Syllabus record: the per-year description of one subject.
//!
//! # Invariants
//! - At most one syllabus exists per `(subject_id, academic_year)`.
//! - Removing the subject removes its syllabi (`ON DELETE CASCADE`).

use crate::model::entity::{Entity, EntityId};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syllabus {
    pub id: EntityId,
    pub subject_id: EntityId,
    /// Formatted as `YYYY/YYYY`, e.g. `2025/2026`.
    pub academic_year: String,
    pub goals: String,
    pub content: String,
    pub literature: Option<String>,
    pub assessment: Option<String>,
}

impl Syllabus {
    pub fn new(
        subject_id: EntityId,
        academic_year: impl Into<String>,
        goals: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            subject_id,
            academic_year: academic_year.into(),
            goals: goals.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

impl Entity for Syllabus {
    const NAME: &'static str = "syllabus";
    const TABLE: &'static str = "syllabi";
    const COLUMNS: &'static [&'static str] = &[
        "subject_id",
        "academic_year",
        "goals",
        "content",
        "literature",
        "assessment",
    ];

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.subject_id),
            Value::from(self.academic_year.clone()),
            Value::from(self.goals.clone()),
            Value::from(self.content.clone()),
            Value::from(self.literature.clone()),
            Value::from(self.assessment.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            subject_id: row.get("subject_id")?,
            academic_year: row.get("academic_year")?,
            goals: row.get("goals")?,
            content: row.get("content")?,
            literature: row.get("literature")?,
            assessment: row.get("assessment")?,
        })
    }
}
