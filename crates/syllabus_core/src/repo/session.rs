//! Scope-bound persistence context (unit of work).
//!
//! # Responsibility
//! - Record staged inserts/updates/deletes in call order.
//! - Apply the whole staged set in one transaction on `save()`.
//! - Track the identities loaded or written through this scope.
//!
//! # Invariants
//! - Reads always go to the store; staged changes are invisible until saved.
//! - `save()` commits every staged change or none of them.
//! - A failed `save()` leaves the staged set untouched.
//! - A session is confined to one thread and one logical unit of work.

use crate::model::entity::{Entity, EntityId, EntityKey, ID_COLUMN, UNASSIGNED_ID};
use crate::repo::entity_repo::SqliteEntityRepository;
use crate::repo::error::{ChangeKind, RepoError, RepoResult};
use crate::repo::schema::ensure_connection_ready;
use log::{debug, error, info};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// Handle for a staged insert, resolved to the stored id by `SaveOutcome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PendingInsert(u64);

/// Result of a successful `Session::save()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Sum of the row counts SQLite reported for every applied change.
    pub rows_affected: usize,
    assigned_ids: BTreeMap<PendingInsert, EntityId>,
}

impl SaveOutcome {
    /// Returns the id the store holds for a staged insert.
    pub fn id_of(&self, pending: PendingInsert) -> Option<EntityId> {
        self.assigned_ids.get(&pending).copied()
    }

    /// Ids of every inserted record, in staging order.
    pub fn inserted_ids(&self) -> Vec<EntityId> {
        self.assigned_ids.values().copied().collect()
    }
}

#[derive(Debug, Clone)]
struct StagedChange {
    kind: ChangeKind,
    entity: &'static str,
    key: EntityKey,
    columns: &'static [&'static str],
    values: Vec<Value>,
    pending: Option<PendingInsert>,
}

/// Persistence context over one SQLite connection.
pub struct Session<'conn> {
    conn: &'conn Connection,
    staged: RefCell<Vec<StagedChange>>,
    tracked: RefCell<BTreeSet<EntityKey>>,
    next_pending: Cell<u64>,
}

impl<'conn> Session<'conn> {
    /// Opens a session on a connection prepared by `db::open_db*`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema does
    ///   not match the entity mappings.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self {
            conn,
            staged: RefCell::new(Vec::new()),
            tracked: RefCell::new(BTreeSet::new()),
            next_pending: Cell::new(0),
        })
    }

    /// Returns the repository for entity type `T` bound to this session.
    pub fn repository<T: Entity>(&self) -> SqliteEntityRepository<'_, 'conn, T> {
        SqliteEntityRepository::new(self)
    }

    /// Loads one record by identity, or `None` when the store has none.
    pub fn find<T: Entity>(&self, id: EntityId) -> RepoResult<Option<T>> {
        let sql = format!("{} WHERE {ID_COLUMN} = ?1;", select_sql::<T>());
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let found = stmt.query_row([id], |row| T::from_row(row)).optional()?;
        if found.is_some() {
            self.track(EntityKey::of::<T>(id));
        }
        Ok(found)
    }

    /// Loads every record of `T`, ordered by identity.
    pub fn all<T: Entity>(&self) -> RepoResult<Vec<T>> {
        let sql = format!("{} ORDER BY {ID_COLUMN} ASC;", select_sql::<T>());
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let mut rows = stmt.query([])?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(T::from_row(row)?);
        }

        let mut tracked = self.tracked.borrow_mut();
        tracked.extend(entities.iter().map(|entity| EntityKey::of::<T>(entity.id())));
        Ok(entities)
    }

    /// Direct existence query; does not consult tracking.
    pub fn exists<T: Entity>(&self, id: EntityId) -> RepoResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {ID_COLUMN} = ?1);",
            T::TABLE
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let exists: i64 = stmt.query_row([id], |row| row.get(0))?;
        Ok(exists == 1)
    }

    /// Stages an insert. A transient entity gets its id from the store.
    pub fn stage_insert<T: Entity>(&self, entity: &T) -> RepoResult<PendingInsert> {
        let values = checked_values(entity)?;
        let pending = PendingInsert(self.next_pending.get());
        self.next_pending.set(pending.0 + 1);
        self.push(StagedChange {
            kind: ChangeKind::Insert,
            entity: T::NAME,
            key: EntityKey::of::<T>(entity.id()),
            columns: T::COLUMNS,
            values,
            pending: Some(pending),
        });
        Ok(pending)
    }

    /// Stages a full-row overwrite keyed by `entity.id()`.
    pub fn stage_update<T: Entity>(&self, entity: &T) -> RepoResult<()> {
        let values = checked_values(entity)?;
        self.push(StagedChange {
            kind: ChangeKind::Update,
            entity: T::NAME,
            key: EntityKey::of::<T>(entity.id()),
            columns: T::COLUMNS,
            values,
            pending: None,
        });
        Ok(())
    }

    /// Stages removal of the `T` record with the given identity.
    pub fn stage_delete<T: Entity>(&self, id: EntityId) {
        self.push(StagedChange {
            kind: ChangeKind::Delete,
            entity: T::NAME,
            key: EntityKey::of::<T>(id),
            columns: &[],
            values: Vec::new(),
            pending: None,
        });
    }

    /// Number of staged, unsaved changes.
    pub fn pending_changes(&self) -> usize {
        self.staged.borrow().len()
    }

    /// Drops every staged change without touching the store.
    pub fn discard(&self) {
        let dropped = self.staged.take().len();
        if dropped > 0 {
            debug!("event=session_discard module=repo status=ok changes={dropped}");
        }
    }

    /// Returns whether a `T` record with this id was loaded or written here.
    pub fn is_tracked<T: Entity>(&self, id: EntityId) -> bool {
        self.tracked.borrow().contains(&EntityKey::of::<T>(id))
    }

    /// Applies all staged changes, in call order, in one transaction.
    ///
    /// # Errors
    /// - `StaleWrite` when a staged update/delete matches no row.
    /// - Store errors (constraint violations, I/O) unchanged.
    ///
    /// On error the transaction is rolled back and the staged set is kept.
    pub fn save(&self) -> RepoResult<SaveOutcome> {
        let started_at = Instant::now();
        let staged = self.staged.borrow();
        if staged.is_empty() {
            return Ok(SaveOutcome::default());
        }

        let mut outcome = SaveOutcome::default();
        let mut written = Vec::with_capacity(staged.len());
        let result = (|| -> RepoResult<()> {
            let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
            for change in staged.iter() {
                let (id, changed) = apply_change(&tx, change)?;
                outcome.rows_affected += changed;
                if let Some(pending) = change.pending {
                    outcome.assigned_ids.insert(pending, id);
                }
                written.push((change.kind, EntityKey { id, ..change.key }));
            }
            tx.commit()?;
            Ok(())
        })();

        if let Err(err) = result {
            error!(
                "event=session_save module=repo status=error changes={} duration_ms={} error={err}",
                staged.len(),
                started_at.elapsed().as_millis()
            );
            return Err(err);
        }

        let applied = staged.len();
        drop(staged);
        self.staged.borrow_mut().clear();

        let mut tracked = self.tracked.borrow_mut();
        for (kind, key) in written {
            match kind {
                ChangeKind::Insert | ChangeKind::Update => tracked.insert(key),
                ChangeKind::Delete => tracked.remove(&key),
            };
        }

        info!(
            "event=session_save module=repo status=ok changes={applied} rows={} duration_ms={}",
            outcome.rows_affected,
            started_at.elapsed().as_millis()
        );
        Ok(outcome)
    }

    fn push(&self, change: StagedChange) {
        debug!(
            "event=session_stage module=repo kind={} entity={} id={}",
            change.kind, change.entity, change.key.id
        );
        self.staged.borrow_mut().push(change);
    }

    fn track(&self, key: EntityKey) {
        self.tracked.borrow_mut().insert(key);
    }
}

fn select_sql<T: Entity>() -> String {
    format!(
        "SELECT {ID_COLUMN}, {} FROM {}",
        T::COLUMNS.join(", "),
        T::TABLE
    )
}

fn checked_values<T: Entity>(entity: &T) -> RepoResult<Vec<Value>> {
    let values = entity.column_values();
    if values.len() != T::COLUMNS.len() {
        return Err(RepoError::InvalidData(format!(
            "{} mapping produced {} values for {} columns",
            T::NAME,
            values.len(),
            T::COLUMNS.len()
        )));
    }
    Ok(values)
}

// Returns the identity of the written row and the row count SQLite reports.
fn apply_change(tx: &Transaction<'_>, change: &StagedChange) -> RepoResult<(EntityId, usize)> {
    let table = change.key.table;
    match change.kind {
        ChangeKind::Insert if change.key.id == UNASSIGNED_ID => {
            let sql = format!(
                "INSERT INTO {table} ({}) VALUES ({});",
                change.columns.join(", "),
                placeholders(1, change.columns.len())
            );
            let changed = tx.execute(&sql, params_from_iter(change.values.iter()))?;
            Ok((tx.last_insert_rowid(), changed))
        }
        ChangeKind::Insert => {
            let sql = format!(
                "INSERT INTO {table} ({ID_COLUMN}, {}) VALUES ({});",
                change.columns.join(", "),
                placeholders(1, change.columns.len() + 1)
            );
            let id = Value::Integer(change.key.id);
            let changed = tx.execute(
                &sql,
                params_from_iter(std::iter::once(&id).chain(change.values.iter())),
            )?;
            Ok((change.key.id, changed))
        }
        ChangeKind::Update => {
            let assignments = change
                .columns
                .iter()
                .enumerate()
                .map(|(index, column)| format!("{column} = ?{}", index + 1))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "UPDATE {table} SET {assignments} WHERE {ID_COLUMN} = ?{};",
                change.columns.len() + 1
            );
            let id = Value::Integer(change.key.id);
            let changed = tx.execute(
                &sql,
                params_from_iter(change.values.iter().chain(std::iter::once(&id))),
            )?;
            ensure_row_matched(change, changed)
        }
        ChangeKind::Delete => {
            let changed = tx.execute(
                &format!("DELETE FROM {table} WHERE {ID_COLUMN} = ?1;"),
                [change.key.id],
            )?;
            ensure_row_matched(change, changed)
        }
    }
}

fn ensure_row_matched(change: &StagedChange, changed: usize) -> RepoResult<(EntityId, usize)> {
    if changed == 0 {
        return Err(RepoError::StaleWrite {
            entity: change.entity,
            id: change.key.id,
            kind: change.kind,
        });
    }
    Ok((change.key.id, changed))
}

fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::placeholders;

    #[test]
    fn placeholders_are_numbered_from_first() {
        assert_eq!(placeholders(1, 3), "?1, ?2, ?3");
        assert_eq!(placeholders(4, 1), "?4");
        assert_eq!(placeholders(1, 0), "");
    }
}
