//! Subject (course) record.

use crate::model::entity::{Entity, EntityId};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: EntityId,
    /// Catalogue code, unique across subjects (e.g. `CS-101`).
    pub code: String,
    pub name: String,
    pub ects_credits: u32,
    pub semester: u32,
    /// Responsible teacher, if assigned.
    pub teacher_id: Option<EntityId>,
}

impl Subject {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        ects_credits: u32,
        semester: u32,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            ects_credits,
            semester,
            ..Self::default()
        }
    }
}

impl Entity for Subject {
    const NAME: &'static str = "subject";
    const TABLE: &'static str = "subjects";
    const COLUMNS: &'static [&'static str] =
        &["code", "name", "ects_credits", "semester", "teacher_id"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.code.clone()),
            Value::from(self.name.clone()),
            Value::from(self.ects_credits),
            Value::from(self.semester),
            Value::from(self.teacher_id),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            code: row.get("code")?,
            name: row.get("name")?,
            ects_credits: row.get("ects_credits")?,
            semester: row.get("semester")?,
            teacher_id: row.get("teacher_id")?,
        })
    }
}
