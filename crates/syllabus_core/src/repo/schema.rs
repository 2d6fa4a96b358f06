//! Connection readiness checks run before a session is handed out.

use crate::db::migrations::{current_version, latest_version};
use crate::model::document_template::DocumentTemplate;
use crate::model::entity::{Entity, ID_COLUMN};
use crate::model::subject::Subject;
use crate::model::syllabus::Syllabus;
use crate::model::teacher::Teacher;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::Connection;

pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    ensure_entity_table::<Teacher>(conn)?;
    ensure_entity_table::<Subject>(conn)?;
    ensure_entity_table::<Syllabus>(conn)?;
    ensure_entity_table::<DocumentTemplate>(conn)?;
    Ok(())
}

fn ensure_entity_table<T: Entity>(conn: &Connection) -> RepoResult<()> {
    let columns = table_columns(conn, T::TABLE)?;
    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(T::TABLE));
    }

    for &column in std::iter::once(&ID_COLUMN).chain(T::COLUMNS) {
        if !columns.iter().any(|existing| existing == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: T::TABLE,
                column,
            });
        }
    }
    Ok(())
}

// `PRAGMA table_info` yields no rows for an unknown table.
fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}
