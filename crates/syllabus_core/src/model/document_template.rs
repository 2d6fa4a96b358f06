//! Document template record used by syllabus document generation.

use crate::model::entity::{Entity, EntityId};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTemplate {
    pub id: EntityId,
    /// Unique across templates.
    pub name: String,
    /// Text with `{{placeholder}}` tokens.
    pub body: String,
}

impl DocumentTemplate {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            ..Self::default()
        }
    }
}

impl Entity for DocumentTemplate {
    const NAME: &'static str = "document template";
    const TABLE: &'static str = "document_templates";
    const COLUMNS: &'static [&'static str] = &["name", "body"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.name.clone()),
            Value::from(self.body.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            body: row.get("body")?,
        })
    }
}
