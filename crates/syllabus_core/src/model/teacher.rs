//! Teacher record.

use crate::model::entity::{Entity, EntityId};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A member of teaching staff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    /// Unique across teachers.
    pub email: String,
    /// e.g. `dr`, `prof. dr`.
    pub academic_title: Option<String>,
}

impl Teacher {
    /// Creates a transient teacher; the store assigns `id` on save.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Display name including the academic title when present.
    pub fn full_name(&self) -> String {
        match self.academic_title.as_deref() {
            Some(title) if !title.trim().is_empty() => {
                format!("{} {} {}", title.trim(), self.first_name, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

impl Entity for Teacher {
    const NAME: &'static str = "teacher";
    const TABLE: &'static str = "teachers";
    const COLUMNS: &'static [&'static str] =
        &["first_name", "last_name", "email", "academic_title"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.first_name.clone()),
            Value::from(self.last_name.clone()),
            Value::from(self.email.clone()),
            Value::from(self.academic_title.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
            academic_title: row.get("academic_title")?,
        })
    }
}
