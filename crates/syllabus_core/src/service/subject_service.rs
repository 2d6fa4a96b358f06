//! Subject use-case service.
//!
//! # Invariants
//! - A referenced teacher must exist when the change is staged.
//! - Codes are stored uppercased; uniqueness is enforced by the store.

use crate::model::entity::EntityId;
use crate::model::subject::Subject;
use crate::model::teacher::Teacher;
use crate::repo::entity_repo::{EntityRepository, SqliteEntityRepository};
use crate::repo::session::{PendingInsert, Session};
use crate::service::validate::{in_range, required, subject_code};
use crate::service::{require_exists, ServiceResult};
use serde::{Deserialize, Serialize};

pub const MAX_ECTS_CREDITS: u32 = 30;
pub const MAX_SEMESTER: u32 = 12;

/// Create/update payload for a subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectInput {
    pub code: String,
    pub name: String,
    pub ects_credits: u32,
    pub semester: u32,
    #[serde(default)]
    pub teacher_id: Option<EntityId>,
}

pub struct SubjectService<S, T>
where
    S: EntityRepository<Subject>,
    T: EntityRepository<Teacher>,
{
    subjects: S,
    teachers: T,
}

impl<'s, 'conn>
    SubjectService<
        SqliteEntityRepository<'s, 'conn, Subject>,
        SqliteEntityRepository<'s, 'conn, Teacher>,
    >
{
    pub fn for_session(session: &'s Session<'conn>) -> Self {
        Self::new(session.repository(), session.repository())
    }
}

impl<S, T> SubjectService<S, T>
where
    S: EntityRepository<Subject>,
    T: EntityRepository<Teacher>,
{
    pub fn new(subjects: S, teachers: T) -> Self {
        Self { subjects, teachers }
    }

    pub fn create(&self, input: &SubjectInput) -> ServiceResult<PendingInsert> {
        let subject = self.build_subject(Subject::default(), input)?;
        Ok(self.subjects.add(&subject)?)
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<Subject> {
        Ok(self.subjects.get_by_id(id)?)
    }

    pub fn list(&self) -> ServiceResult<Vec<Subject>> {
        Ok(self.subjects.get_all()?)
    }

    /// Lists subjects whose responsible teacher is `teacher_id`.
    pub fn list_for_teacher(&self, teacher_id: EntityId) -> ServiceResult<Vec<Subject>> {
        require_exists::<Teacher, _>(&self.teachers, teacher_id)?;
        let mut subjects = self.subjects.get_all()?;
        subjects.retain(|subject| subject.teacher_id == Some(teacher_id));
        Ok(subjects)
    }

    pub fn update(&self, id: EntityId, input: &SubjectInput) -> ServiceResult<Subject> {
        let current = self.subjects.get_by_id(id)?;
        let subject = self.build_subject(current, input)?;
        self.subjects.update(&subject)?;
        Ok(subject)
    }

    /// Sets or clears the responsible teacher.
    pub fn assign_teacher(
        &self,
        subject_id: EntityId,
        teacher_id: Option<EntityId>,
    ) -> ServiceResult<Subject> {
        let mut subject = self.subjects.get_by_id(subject_id)?;
        if let Some(teacher_id) = teacher_id {
            require_exists::<Teacher, _>(&self.teachers, teacher_id)?;
        }
        subject.teacher_id = teacher_id;
        self.subjects.update(&subject)?;
        Ok(subject)
    }

    /// Stages removal; the store cascades to the subject's syllabi.
    pub fn delete(&self, id: EntityId) -> ServiceResult<()> {
        require_exists::<Subject, _>(&self.subjects, id)?;
        Ok(self.subjects.delete_by_id(id)?)
    }

    fn build_subject(&self, mut subject: Subject, input: &SubjectInput) -> ServiceResult<Subject> {
        subject.code = subject_code("code", &input.code)?;
        subject.name = required("name", &input.name)?;
        subject.ects_credits = in_range("ects_credits", input.ects_credits, 1, MAX_ECTS_CREDITS)?;
        subject.semester = in_range("semester", input.semester, 1, MAX_SEMESTER)?;
        if let Some(teacher_id) = input.teacher_id {
            require_exists::<Teacher, _>(&self.teachers, teacher_id)?;
        }
        subject.teacher_id = input.teacher_id;
        Ok(subject)
    }
}
