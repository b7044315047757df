//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the storage gateway operations over the `employees` table.
//! - Keep SQL details inside the core persistence boundary.
//! - Own the connection so teardown is an explicit call on the gateway.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Id-keyed writes report `NotFound` distinctly from transport errors.
//! - Listing order is insertion order; salary order breaks ties the same way.

use crate::db::migrations::{current_version, latest_version};
use crate::db::{close_db, DbError};
use crate::model::employee::{
    Employee, EmployeeFields, EmployeeId, EmployeeValidationError, SortDirection,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EMPLOYEE_COLUMNS: &str = "uuid, name, position, salary";
const REQUIRED_COLUMNS: &[&str] = &["uuid", "name", "position", "salary", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EmployeeValidationError),
    Db(DbError),
    NotFound(EmployeeId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns whether this error means the backend failed, as opposed to
    /// the request being rejected.
    pub fn is_connection_failure(&self) -> bool {
        !matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage gateway for employee records.
pub trait EmployeeRepository {
    /// Persists a new record and returns its id.
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeId>;
    /// Gets one record by id.
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Lists all records in insertion order.
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    /// Lists all records ordered by salary.
    fn list_employees_by_salary(&self, direction: SortDirection) -> RepoResult<Vec<Employee>>;
    /// Overwrites all mutable fields and returns the post-update record.
    fn update_employee(&self, id: EmployeeId, fields: &EmployeeFields) -> RepoResult<Employee>;
    /// Removes one record and returns what was removed.
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<Employee>;
    /// Releases the underlying connection.
    fn close(self) -> RepoResult<()>
    where
        Self: Sized;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository {
    conn: Connection,
}

impl SqliteEmployeeRepository {
    /// Wraps a migrated connection after checking its schema.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl EmployeeRepository for SqliteEmployeeRepository {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        employee.validate()?;

        self.conn.execute(
            "INSERT INTO employees (uuid, name, position, salary)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                employee.id.to_string(),
                employee.name.as_str(),
                employee.position.as_str(),
                employee.salary,
            ],
        )?;

        Ok(employee.id)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE uuid = ?1;"
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        self.query_all(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY rowid ASC;"
        ))
    }

    fn list_employees_by_salary(&self, direction: SortDirection) -> RepoResult<Vec<Employee>> {
        let order = match direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        self.query_all(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY salary {order}, rowid ASC;"
        ))
    }

    fn update_employee(&self, id: EmployeeId, fields: &EmployeeFields) -> RepoResult<Employee> {
        fields.validate()?;

        let updated = self
            .conn
            .query_row(
                &format!(
                    "UPDATE employees
                     SET
                        name = ?1,
                        position = ?2,
                        salary = ?3,
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE uuid = ?4
                     RETURNING {EMPLOYEE_COLUMNS};"
                ),
                params![
                    fields.name.as_str(),
                    fields.position.as_str(),
                    fields.salary,
                    id.to_string(),
                ],
                read_raw_row,
            )
            .optional()?;

        match updated {
            Some(raw) => raw.into_employee(),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<Employee> {
        let deleted = self
            .conn
            .query_row(
                &format!("DELETE FROM employees WHERE uuid = ?1 RETURNING {EMPLOYEE_COLUMNS};"),
                [id.to_string()],
                read_raw_row,
            )
            .optional()?;

        match deleted {
            Some(raw) => raw.into_employee(),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn close(self) -> RepoResult<()> {
        close_db(self.conn)?;
        Ok(())
    }
}

impl SqliteEmployeeRepository {
    fn query_all(&self, sql: &str) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }
}

/// Column values as read, before identity and invariant checks.
struct RawEmployeeRow {
    uuid: String,
    name: String,
    position: String,
    salary: f64,
}

impl RawEmployeeRow {
    fn into_employee(self) -> RepoResult<Employee> {
        let id = Uuid::parse_str(&self.uuid).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid uuid value `{}` in employees.uuid",
                self.uuid
            ))
        })?;

        let employee = Employee {
            id,
            name: self.name,
            position: self.position,
            salary: self.salary,
        };
        employee
            .validate()
            .map_err(|err| RepoError::InvalidData(format!("employee {id}: {err}")))?;
        Ok(employee)
    }
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawEmployeeRow> {
    Ok(RawEmployeeRow {
        uuid: row.get("uuid")?,
        name: row.get("name")?,
        position: row.get("position")?,
        salary: row.get("salary")?,
    })
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    read_raw_row(row)?.into_employee()
}

fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'employees'
        );",
        [],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable("employees"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(employees);")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|required| !columns.iter().any(|column| column == *required))
    {
        return Err(RepoError::MissingRequiredColumn {
            table: "employees",
            column: *missing,
        });
    }

    Ok(())
}
