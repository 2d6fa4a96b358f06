//! Generic entity repository.
//!
//! # Responsibility
//! - Expose one uniform CRUD/existence contract for every entity type.
//! - Delegate straight to the owning `Session`; hold no data of its own.
//!
//! # Invariants
//! - Writes are staged only; they reach the store on `Session::save()`.
//! - `get_by_id` fails with `EntityNotFound`; every other read reports
//!   absence through its return value.

use crate::model::entity::{Entity, EntityId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::session::{PendingInsert, Session};
use std::marker::PhantomData;

/// Repository contract consumed by application services.
pub trait EntityRepository<T: Entity> {
    /// Loads the record with `id` and tracks it in the current scope.
    fn get_by_id(&self, id: EntityId) -> RepoResult<T>;
    /// Loads every record of `T`. No pagination.
    fn get_all(&self) -> RepoResult<Vec<T>>;
    /// Stages an insert; resolve the handle through `SaveOutcome::id_of`.
    fn add(&self, entity: &T) -> RepoResult<PendingInsert>;
    /// Stages a full-row overwrite keyed by `entity.id()`.
    fn update(&self, entity: &T) -> RepoResult<()>;
    /// Stages removal keyed by `entity.id()`.
    fn delete(&self, entity: &T) -> RepoResult<()>;
    /// Stages removal by identity alone.
    fn delete_by_id(&self, id: EntityId) -> RepoResult<()>;
    /// Asks the store whether a record with `id` exists.
    fn exists(&self, id: EntityId) -> RepoResult<bool>;

    fn exists_entity(&self, entity: &T) -> RepoResult<bool> {
        self.exists(entity.id())
    }
}

/// `EntityRepository` backed by a SQLite `Session`.
pub struct SqliteEntityRepository<'s, 'conn, T> {
    session: &'s Session<'conn>,
    _entity: PhantomData<fn() -> T>,
}

impl<'s, 'conn, T: Entity> SqliteEntityRepository<'s, 'conn, T> {
    pub fn new(session: &'s Session<'conn>) -> Self {
        Self {
            session,
            _entity: PhantomData,
        }
    }

    /// Session this repository stages into.
    pub fn session(&self) -> &'s Session<'conn> {
        self.session
    }
}

impl<T: Entity> Clone for SqliteEntityRepository<'_, '_, T> {
    fn clone(&self) -> Self {
        Self::new(self.session)
    }
}

impl<T: Entity> EntityRepository<T> for SqliteEntityRepository<'_, '_, T> {
    fn get_by_id(&self, id: EntityId) -> RepoResult<T> {
        self.session
            .find::<T>(id)?
            .ok_or(RepoError::EntityNotFound { entity: T::NAME, id })
    }

    fn get_all(&self) -> RepoResult<Vec<T>> {
        self.session.all::<T>()
    }

    fn add(&self, entity: &T) -> RepoResult<PendingInsert> {
        self.session.stage_insert(entity)
    }

    fn update(&self, entity: &T) -> RepoResult<()> {
        self.session.stage_update(entity)
    }

    fn delete(&self, entity: &T) -> RepoResult<()> {
        self.delete_by_id(entity.id())
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        self.session.stage_delete::<T>(id);
        Ok(())
    }

    fn exists(&self, id: EntityId) -> RepoResult<bool> {
        self.session.exists::<T>(id)
    }
}
