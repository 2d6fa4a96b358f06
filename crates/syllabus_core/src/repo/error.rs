//! Repository error taxonomy.

use crate::db::DbError;
use crate::model::entity::EntityId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Kind of staged write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl Display for ChangeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

#[derive(Debug)]
pub enum RepoError {
    /// Identity lookup found no record.
    EntityNotFound { entity: &'static str, id: EntityId },
    /// A staged update/delete matched no row when the session was saved.
    StaleWrite {
        entity: &'static str,
        id: EntityId,
        kind: ChangeKind,
    },
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl RepoError {
    /// Returns whether the store rejected a write on a constraint
    /// (unique, foreign key, check, not null).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntityNotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::StaleWrite { entity, id, kind } => write!(
                f,
                "{kind} of {entity} {id} affected no rows; record is missing or was removed"
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match required {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::InvalidData(message) => write!(f, "invalid entity data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
