//! Versioned schema scripts and their executor.
//!
//! # Invariants
//! - `version` values are strictly increasing with no gaps.
//! - All pending scripts run in one transaction; `user_version` follows each.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "teachers_subjects",
        sql: include_str!("0001_teachers_subjects.sql"),
    },
    Migration {
        version: 2,
        name: "syllabi",
        sql: include_str!("0002_syllabi.sql"),
    },
    Migration {
        version: 3,
        name: "document_templates",
        sql: include_str!("0003_document_templates.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version recorded in `PRAGMA user_version`.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    apply(conn, MIGRATIONS)
}

pub(crate) fn apply(conn: &mut Connection, migrations: &[Migration]) -> DbResult<()> {
    let current = current_version(conn)?;
    let latest = migrations.last().map_or(0, |migration| migration.version);

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in migrations.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql)
            .and_then(|()| {
                tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            })
            .map_err(|source| DbError::Migration {
                version: migration.version,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply, current_version, Migration, MIGRATIONS};
    use crate::db::DbError;
    use rusqlite::Connection;

    fn table_exists(conn: &Connection, table: &str) -> bool {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn versions_are_contiguous_from_one() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1);
        }
    }

    #[test]
    fn failing_script_rolls_back_the_whole_batch() {
        let mut conn = Connection::open_in_memory().unwrap();
        let batch = [
            Migration {
                version: 1,
                name: "rooms",
                sql: "CREATE TABLE rooms (id INTEGER PRIMARY KEY, label TEXT NOT NULL);",
            },
            Migration {
                version: 2,
                name: "broken",
                sql: "CREATE TABLE seats (id INTEGER PRIMARY KEY); INSERT INTO missing_table VALUES (1);",
            },
        ];

        let err = apply(&mut conn, &batch).unwrap_err();

        assert!(matches!(err, DbError::Migration { version: 2, .. }));
        assert_eq!(current_version(&conn).unwrap(), 0);
        assert!(!table_exists(&conn, "rooms"));
        assert!(!table_exists(&conn, "seats"));
    }

    #[test]
    fn failure_after_applied_versions_keeps_earlier_schema() {
        let mut conn = Connection::open_in_memory().unwrap();
        let first = [Migration {
            version: 1,
            name: "rooms",
            sql: "CREATE TABLE rooms (id INTEGER PRIMARY KEY);",
        }];
        apply(&mut conn, &first).unwrap();

        let next = [
            first[0],
            Migration {
                version: 2,
                name: "buildings",
                sql: "CREATE TABLE buildings (id INTEGER PRIMARY KEY);",
            },
            Migration {
                version: 3,
                name: "broken",
                sql: "ALTER TABLE no_such_table ADD COLUMN label TEXT;",
            },
        ];
        let err = apply(&mut conn, &next).unwrap_err();

        assert!(matches!(err, DbError::Migration { version: 3, .. }));
        assert_eq!(current_version(&conn).unwrap(), 1);
        assert!(table_exists(&conn, "rooms"));
        assert!(!table_exists(&conn, "buildings"));
    }
}
