//! Application services over the entity repositories.
//!
//! # Responsibility
//! - Validate transport input and map it onto entities.
//! - Stage writes through `EntityRepository`; the owning scope commits with
//!   `Session::save()`.
//! - Translate repository failures into service-level errors.
//!
//! # Invariants
//! - Services never commit on their own.
//! - Services depend on the repository trait only, never on SQL.

use crate::model::entity::{Entity, EntityId};
use crate::repo::entity_repo::EntityRepository;
use crate::repo::error::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod document_service;
pub mod subject_service;
pub mod syllabus_service;
pub mod teacher_service;
pub mod template_service;
mod validate;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error, shaped for translation into client/server responses.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected before touching storage.
    Validation {
        field: &'static str,
        message: String,
    },
    /// Referenced record does not exist.
    NotFound { entity: &'static str, id: EntityId },
    /// Store rejected the write on a uniqueness or reference constraint.
    Conflict(String),
    Repo(RepoError),
}

impl ServiceError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Returns whether the caller sent something wrong (as opposed to a
    /// storage failure).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Repo(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field, message } => write!(f, "invalid `{field}`: {message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Conflict(details) => write!(f, "conflict: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EntityNotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::StaleWrite { entity, id, .. } => Self::NotFound { entity, id },
            other if other.is_constraint_violation() => Self::Conflict(other.to_string()),
            other => Self::Repo(other),
        }
    }
}

/// Fails with `NotFound` unless `repo` holds a record with `id`.
pub(crate) fn require_exists<T, R>(repo: &R, id: EntityId) -> ServiceResult<()>
where
    T: Entity,
    R: EntityRepository<T>,
{
    if repo.exists(id)? {
        Ok(())
    } else {
        Err(ServiceError::NotFound {
            entity: T::NAME,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;
    use crate::repo::error::{ChangeKind, RepoError};

    #[test]
    fn missing_records_map_to_not_found() {
        let from_lookup = ServiceError::from(RepoError::EntityNotFound {
            entity: "teacher",
            id: 4,
        });
        assert!(matches!(
            from_lookup,
            ServiceError::NotFound {
                entity: "teacher",
                id: 4
            }
        ));

        let from_save = ServiceError::from(RepoError::StaleWrite {
            entity: "subject",
            id: 9,
            kind: ChangeKind::Update,
        });
        assert!(matches!(from_save, ServiceError::NotFound { id: 9, .. }));
        assert!(from_save.is_client_error());
    }

    #[test]
    fn storage_failures_stay_server_errors() {
        let err = ServiceError::from(RepoError::InvalidData("bad".to_string()));
        assert!(matches!(err, ServiceError::Repo(_)));
        assert!(!err.is_client_error());
    }
}
