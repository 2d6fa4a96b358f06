//! Teacher use-case service.

use crate::model::entity::EntityId;
use crate::model::teacher::Teacher;
use crate::repo::entity_repo::{EntityRepository, SqliteEntityRepository};
use crate::repo::session::{PendingInsert, Session};
use crate::service::validate::{email, optional, required};
use crate::service::{require_exists, ServiceResult};
use serde::{Deserialize, Serialize};

/// Create/update payload for a teacher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub academic_title: Option<String>,
}

pub struct TeacherService<R: EntityRepository<Teacher>> {
    teachers: R,
}

impl<'s, 'conn> TeacherService<SqliteEntityRepository<'s, 'conn, Teacher>> {
    pub fn for_session(session: &'s Session<'conn>) -> Self {
        Self::new(session.repository())
    }
}

impl<R: EntityRepository<Teacher>> TeacherService<R> {
    pub fn new(teachers: R) -> Self {
        Self { teachers }
    }

    /// Stages a new teacher. The email is stored lowercased.
    pub fn create(&self, input: &TeacherInput) -> ServiceResult<PendingInsert> {
        let teacher = build_teacher(Teacher::default(), input)?;
        Ok(self.teachers.add(&teacher)?)
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<Teacher> {
        Ok(self.teachers.get_by_id(id)?)
    }

    pub fn list(&self) -> ServiceResult<Vec<Teacher>> {
        Ok(self.teachers.get_all()?)
    }

    /// Replaces every field of an existing teacher and returns the staged state.
    pub fn update(&self, id: EntityId, input: &TeacherInput) -> ServiceResult<Teacher> {
        let current = self.teachers.get_by_id(id)?;
        let teacher = build_teacher(current, input)?;
        self.teachers.update(&teacher)?;
        Ok(teacher)
    }

    /// Stages removal; subjects taught by this teacher become unassigned.
    pub fn delete(&self, id: EntityId) -> ServiceResult<()> {
        require_exists::<Teacher, _>(&self.teachers, id)?;
        Ok(self.teachers.delete_by_id(id)?)
    }
}

fn build_teacher(mut teacher: Teacher, input: &TeacherInput) -> ServiceResult<Teacher> {
    teacher.first_name = required("first_name", &input.first_name)?;
    teacher.last_name = required("last_name", &input.last_name)?;
    teacher.email = email("email", &input.email)?;
    teacher.academic_title = optional(input.academic_title.as_deref());
    Ok(teacher)
}
