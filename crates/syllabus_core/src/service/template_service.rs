//! Document template use-case service.

use crate::model::document_template::DocumentTemplate;
use crate::model::entity::EntityId;
use crate::repo::entity_repo::{EntityRepository, SqliteEntityRepository};
use crate::repo::session::{PendingInsert, Session};
use crate::service::document_service::unknown_placeholders;
use crate::service::validate::required;
use crate::service::{require_exists, ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};

/// Create/update payload for a document template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInput {
    pub name: String,
    pub body: String,
}

pub struct DocumentTemplateService<D: EntityRepository<DocumentTemplate>> {
    templates: D,
}

impl<'s, 'conn> DocumentTemplateService<SqliteEntityRepository<'s, 'conn, DocumentTemplate>> {
    pub fn for_session(session: &'s Session<'conn>) -> Self {
        Self::new(session.repository())
    }
}

impl<D: EntityRepository<DocumentTemplate>> DocumentTemplateService<D> {
    pub fn new(templates: D) -> Self {
        Self { templates }
    }

    pub fn create(&self, input: &TemplateInput) -> ServiceResult<PendingInsert> {
        let template = build_template(DocumentTemplate::default(), input)?;
        Ok(self.templates.add(&template)?)
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<DocumentTemplate> {
        Ok(self.templates.get_by_id(id)?)
    }

    pub fn list(&self) -> ServiceResult<Vec<DocumentTemplate>> {
        Ok(self.templates.get_all()?)
    }

    pub fn update(&self, id: EntityId, input: &TemplateInput) -> ServiceResult<DocumentTemplate> {
        let current = self.templates.get_by_id(id)?;
        let template = build_template(current, input)?;
        self.templates.update(&template)?;
        Ok(template)
    }

    pub fn delete(&self, id: EntityId) -> ServiceResult<()> {
        require_exists::<DocumentTemplate, _>(&self.templates, id)?;
        Ok(self.templates.delete_by_id(id)?)
    }
}

fn build_template(
    mut template: DocumentTemplate,
    input: &TemplateInput,
) -> ServiceResult<DocumentTemplate> {
    template.name = required("name", &input.name)?;
    if input.body.trim().is_empty() {
        return Err(ServiceError::validation("body", "must not be empty"));
    }

    let unknown = unknown_placeholders(&input.body);
    if !unknown.is_empty() {
        return Err(ServiceError::validation(
            "body",
            format!("unknown placeholders: {}", unknown.join(", ")),
        ));
    }
    template.body = input.body.clone();
    Ok(template)
}
