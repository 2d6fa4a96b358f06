//! Entity base contract.
//!
//! An entity is a record with one integer identity plus a static mapping to
//! a single table. The mapping is what the persistence context uses to build
//! SQL, so implementations must keep `COLUMNS`, `column_values` and
//! `from_row` in the same order.

use rusqlite::types::Value;
use rusqlite::Row;

/// Integer identity, unique within one entity type.
pub type EntityId = i64;

/// Identity of a record that has not been inserted yet.
///
/// SQLite `AUTOINCREMENT` never hands out `0`, so the store assigns the real
/// id when a transient entity is saved.
pub const UNASSIGNED_ID: EntityId = 0;

/// Name of the identity column shared by every entity table.
pub const ID_COLUMN: &str = "id";

/// Capability contract for persistable records.
pub trait Entity: Default + Clone + 'static {
    /// Human-readable type name used in errors and logs.
    const NAME: &'static str;
    /// Backing table.
    const TABLE: &'static str;
    /// Non-identity columns, in `column_values` order.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> EntityId;

    fn set_id(&mut self, id: EntityId);

    /// Values for `COLUMNS`, same order and length.
    fn column_values(&self) -> Vec<Value>;

    /// Decodes one row selected as `id` followed by `COLUMNS`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Returns whether the store still has to assign this record's id.
    fn is_transient(&self) -> bool {
        self.id() == UNASSIGNED_ID
    }
}

/// `(table, id)` pair identifying one record across entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    pub table: &'static str,
    pub id: EntityId,
}

impl EntityKey {
    pub fn of<T: Entity>(id: EntityId) -> Self {
        Self { table: T::TABLE, id }
    }
}
