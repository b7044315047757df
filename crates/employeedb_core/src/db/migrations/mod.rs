//! Employee schema migrations.
//!
//! | version | name                  | effect                                   |
//! |---------|-----------------------|------------------------------------------|
//! | 1       | `create_employees`    | `employees` table keyed by text UUID     |
//! | 2       | `index_salary`        | index backing the salary sort views      |
//!
//! # Invariants
//! - Versions start at 1 and increase by one.
//! - All pending steps commit together or not at all.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_employees",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "index_salary",
        sql: include_str!("0002_salary_index.sql"),
    },
];

/// Returns the schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version recorded in the employee store.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Upgrades the employee store to `latest_version()`.
///
/// A fresh file goes from 0 to latest in one transaction; an up-to-date
/// file is left untouched.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_version(conn)?;
    let latest = latest_version();

    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }
    if from == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from={} to={} steps={}",
        from,
        latest,
        MIGRATIONS
            .iter()
            .filter(|m| m.version > from)
            .map(|m| m.name)
            .collect::<Vec<_>>()
            .join(",")
    );
    Ok(())
}
