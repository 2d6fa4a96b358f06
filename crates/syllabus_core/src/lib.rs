//! Persistence and application-service core for the syllabus backend.
//!
//! Entities are reached through one generic repository contract over a
//! scope-bound session; services validate input and stage writes, and the
//! owning scope commits with `Session::save()`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::document_template::DocumentTemplate;
pub use model::entity::{Entity, EntityId, EntityKey, UNASSIGNED_ID};
pub use model::subject::Subject;
pub use model::syllabus::Syllabus;
pub use model::teacher::Teacher;
pub use repo::entity_repo::{EntityRepository, SqliteEntityRepository};
pub use repo::error::{ChangeKind, RepoError, RepoResult};
pub use repo::session::{PendingInsert, SaveOutcome, Session};
pub use service::document_service::{DocumentService, RenderedDocument};
pub use service::subject_service::{SubjectInput, SubjectService};
pub use service::syllabus_service::{SyllabusInput, SyllabusService};
pub use service::teacher_service::{TeacherInput, TeacherService};
pub use service::template_service::{DocumentTemplateService, TemplateInput};
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
