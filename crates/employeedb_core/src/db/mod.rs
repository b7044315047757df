//! Employee store bootstrap: connection lifecycle and schema versioning.
//!
//! # Responsibility
//! - Open, configure and close the single connection the CLI holds for its
//!   whole session.
//! - Bring the `employees` table up to the schema this build expects.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - No employee row is read or written before migrations succeed.
//! - A store written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{close_db, open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure reaching or preparing the employee store.
///
/// Every variant counts as a connection failure to callers; none of them
/// says anything about a particular employee record.
#[derive(Debug)]
pub enum DbError {
    /// SQLite refused to open the file, run a query, or close cleanly.
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build of the tool.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "employee store schema version {db_version} is newer than supported {latest_supported}; upgrade the tool"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
