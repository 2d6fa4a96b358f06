//! Syllabus use-case service.
//!
//! # Invariants
//! - A syllabus always references an existing subject.
//! - One syllabus per subject and academic year; duplicates are rejected
//!   before staging and again by the store's unique index.

use crate::model::entity::EntityId;
use crate::model::subject::Subject;
use crate::model::syllabus::Syllabus;
use crate::repo::entity_repo::{EntityRepository, SqliteEntityRepository};
use crate::repo::session::{PendingInsert, Session};
use crate::service::validate::{academic_year, optional, required};
use crate::service::{require_exists, ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};

/// Create/update payload for a syllabus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllabusInput {
    pub subject_id: EntityId,
    pub academic_year: String,
    pub goals: String,
    pub content: String,
    #[serde(default)]
    pub literature: Option<String>,
    #[serde(default)]
    pub assessment: Option<String>,
}

pub struct SyllabusService<Y, S>
where
    Y: EntityRepository<Syllabus>,
    S: EntityRepository<Subject>,
{
    syllabi: Y,
    subjects: S,
}

impl<'s, 'conn>
    SyllabusService<
        SqliteEntityRepository<'s, 'conn, Syllabus>,
        SqliteEntityRepository<'s, 'conn, Subject>,
    >
{
    pub fn for_session(session: &'s Session<'conn>) -> Self {
        Self::new(session.repository(), session.repository())
    }
}

impl<Y, S> SyllabusService<Y, S>
where
    Y: EntityRepository<Syllabus>,
    S: EntityRepository<Subject>,
{
    pub fn new(syllabi: Y, subjects: S) -> Self {
        Self { syllabi, subjects }
    }

    pub fn create(&self, input: &SyllabusInput) -> ServiceResult<PendingInsert> {
        let syllabus = self.build_syllabus(Syllabus::default(), input)?;
        Ok(self.syllabi.add(&syllabus)?)
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<Syllabus> {
        Ok(self.syllabi.get_by_id(id)?)
    }

    pub fn list(&self) -> ServiceResult<Vec<Syllabus>> {
        Ok(self.syllabi.get_all()?)
    }

    /// Lists one subject's syllabi, newest academic year first.
    pub fn list_for_subject(&self, subject_id: EntityId) -> ServiceResult<Vec<Syllabus>> {
        require_exists::<Subject, _>(&self.subjects, subject_id)?;
        let mut syllabi = self.syllabi.get_all()?;
        syllabi.retain(|syllabus| syllabus.subject_id == subject_id);
        syllabi.sort_by(|a, b| b.academic_year.cmp(&a.academic_year));
        Ok(syllabi)
    }

    pub fn update(&self, id: EntityId, input: &SyllabusInput) -> ServiceResult<Syllabus> {
        let current = self.syllabi.get_by_id(id)?;
        let syllabus = self.build_syllabus(current, input)?;
        self.syllabi.update(&syllabus)?;
        Ok(syllabus)
    }

    pub fn delete(&self, id: EntityId) -> ServiceResult<()> {
        require_exists::<Syllabus, _>(&self.syllabi, id)?;
        Ok(self.syllabi.delete_by_id(id)?)
    }

    fn build_syllabus(
        &self,
        mut syllabus: Syllabus,
        input: &SyllabusInput,
    ) -> ServiceResult<Syllabus> {
        require_exists::<Subject, _>(&self.subjects, input.subject_id)?;
        let year = academic_year("academic_year", &input.academic_year)?;

        let duplicate = self.syllabi.get_all()?.into_iter().any(|existing| {
            existing.id != syllabus.id
                && existing.subject_id == input.subject_id
                && existing.academic_year == year
        });
        if duplicate {
            return Err(ServiceError::Conflict(format!(
                "subject {} already has a syllabus for {year}",
                input.subject_id
            )));
        }

        syllabus.subject_id = input.subject_id;
        syllabus.academic_year = year;
        syllabus.goals = required("goals", &input.goals)?;
        syllabus.content = required("content", &input.content)?;
        syllabus.literature = optional(input.literature.as_deref());
        syllabus.assessment = optional(input.assessment.as_deref());
        Ok(syllabus)
    }
}
