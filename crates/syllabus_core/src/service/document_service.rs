//! Syllabus document generation.
//!
//! # Responsibility
//! - Render a stored template against one syllabus, its subject and the
//!   subject's teacher.
//!
//! # Invariants
//! - Placeholders use `{{name}}` with optional inner whitespace.
//! - Only names in `PLACEHOLDERS` are substituted; anything else is rejected
//!   rather than rendered verbatim.
//! - Absent optional values render as an empty string.

use crate::model::document_template::DocumentTemplate;
use crate::model::entity::EntityId;
use crate::model::subject::Subject;
use crate::model::syllabus::Syllabus;
use crate::model::teacher::Teacher;
use crate::repo::entity_repo::{EntityRepository, SqliteEntityRepository};
use crate::repo::session::Session;
use crate::service::{ServiceError, ServiceResult};
use log::info;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::BTreeMap;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z0-9_]+)\s*\}\}").expect("valid placeholder regex")
});

/// Placeholder names a template may reference.
pub const PLACEHOLDERS: &[&str] = &[
    "subject_code",
    "subject_name",
    "ects_credits",
    "semester",
    "teacher_name",
    "teacher_email",
    "academic_year",
    "goals",
    "content",
    "literature",
    "assessment",
];

/// Rendered document ready to hand to a transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    /// Suggested file name, e.g. `syllabus-CS-101-2025-2026.md`.
    pub file_name: String,
    pub body: String,
}

/// Returns placeholder names in `body` that cannot be rendered, deduplicated
/// in first-seen order.
pub fn unknown_placeholders(body: &str) -> Vec<String> {
    let mut unknown: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(body) {
        let name = &caps[1];
        let known = PLACEHOLDERS.iter().any(|placeholder| *placeholder == name);
        if !known && !unknown.iter().any(|seen| seen == name) {
            unknown.push(name.to_string());
        }
    }
    unknown
}

/// Substitutes every placeholder in `body` from `values`.
///
/// Fails on the first name missing from `values`.
pub fn render(body: &str, values: &BTreeMap<&'static str, String>) -> ServiceResult<String> {
    let unknown = unknown_placeholders(body);
    if let Some(name) = unknown.first() {
        return Err(ServiceError::validation(
            "body",
            format!("unknown placeholder `{name}`"),
        ));
    }

    Ok(PLACEHOLDER_RE
        .replace_all(body, |caps: &Captures<'_>| {
            values.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned())
}

pub struct DocumentService<D, Y, S, T>
where
    D: EntityRepository<DocumentTemplate>,
    Y: EntityRepository<Syllabus>,
    S: EntityRepository<Subject>,
    T: EntityRepository<Teacher>,
{
    templates: D,
    syllabi: Y,
    subjects: S,
    teachers: T,
}

impl<'s, 'conn>
    DocumentService<
        SqliteEntityRepository<'s, 'conn, DocumentTemplate>,
        SqliteEntityRepository<'s, 'conn, Syllabus>,
        SqliteEntityRepository<'s, 'conn, Subject>,
        SqliteEntityRepository<'s, 'conn, Teacher>,
    >
{
    pub fn for_session(session: &'s Session<'conn>) -> Self {
        Self::new(
            session.repository(),
            session.repository(),
            session.repository(),
            session.repository(),
        )
    }
}

impl<D, Y, S, T> DocumentService<D, Y, S, T>
where
    D: EntityRepository<DocumentTemplate>,
    Y: EntityRepository<Syllabus>,
    S: EntityRepository<Subject>,
    T: EntityRepository<Teacher>,
{
    pub fn new(templates: D, syllabi: Y, subjects: S, teachers: T) -> Self {
        Self {
            templates,
            syllabi,
            subjects,
            teachers,
        }
    }

    /// Renders `template_id` for `syllabus_id`.
    pub fn render_syllabus(
        &self,
        template_id: EntityId,
        syllabus_id: EntityId,
    ) -> ServiceResult<RenderedDocument> {
        let template = self.templates.get_by_id(template_id)?;
        let syllabus = self.syllabi.get_by_id(syllabus_id)?;
        let subject = self.subjects.get_by_id(syllabus.subject_id)?;
        let teacher = match subject.teacher_id {
            Some(teacher_id) => Some(self.teachers.get_by_id(teacher_id)?),
            None => None,
        };

        let values = placeholder_values(&syllabus, &subject, teacher.as_ref());
        let body = render(&template.body, &values)?;
        let file_name = format!(
            "syllabus-{}-{}.md",
            subject.code,
            syllabus.academic_year.replace('/', "-")
        );

        info!(
            "event=document_render module=service status=ok template_id={template_id} syllabus_id={syllabus_id} bytes={}",
            body.len()
        );
        Ok(RenderedDocument { file_name, body })
    }
}

fn placeholder_values(
    syllabus: &Syllabus,
    subject: &Subject,
    teacher: Option<&Teacher>,
) -> BTreeMap<&'static str, String> {
    BTreeMap::from([
        ("subject_code", subject.code.clone()),
        ("subject_name", subject.name.clone()),
        ("ects_credits", subject.ects_credits.to_string()),
        ("semester", subject.semester.to_string()),
        (
            "teacher_name",
            teacher.map(Teacher::full_name).unwrap_or_default(),
        ),
        (
            "teacher_email",
            teacher.map(|t| t.email.clone()).unwrap_or_default(),
        ),
        ("academic_year", syllabus.academic_year.clone()),
        ("goals", syllabus.goals.clone()),
        ("content", syllabus.content.clone()),
        ("literature", syllabus.literature.clone().unwrap_or_default()),
        ("assessment", syllabus.assessment.clone().unwrap_or_default()),
    ])
}

#[cfg(test)]
mod tests {
    use super::{render, unknown_placeholders, PLACEHOLDERS};
    use std::collections::BTreeMap;

    #[test]
    fn unknown_placeholders_are_reported_once() {
        let body = "{{subject_name}} {{ grade }} {{grade}} {{room}}";
        assert_eq!(unknown_placeholders(body), vec!["grade", "room"]);
    }

    #[test]
    fn render_substitutes_with_inner_whitespace() {
        let values = BTreeMap::from([("subject_name", "Databases".to_string())]);
        let rendered = render("# {{ subject_name }}\n{{goals}}", &values).unwrap();
        assert_eq!(rendered, "# Databases\n");
    }

    #[test]
    fn render_rejects_unknown_names() {
        let err = render("{{nope}}", &BTreeMap::new()).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn every_placeholder_is_known() {
        let body = PLACEHOLDERS
            .iter()
            .map(|name| format!("{{{{{name}}}}}"))
            .collect::<String>();
        assert!(unknown_placeholders(&body).is_empty());
    }
}
