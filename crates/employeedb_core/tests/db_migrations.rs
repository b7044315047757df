use employeedb_core::db::migrations::latest_version;
use employeedb_core::db::{close_db, open_db, open_db_in_memory, DbError};
use employeedb_core::{Employee, EmployeeFields, EmployeeRepository, SqliteEmployeeRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "employees");
}

#[test]
fn records_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("employeedb.sqlite3");

    let repo = SqliteEmployeeRepository::try_new(open_db(&path).unwrap()).unwrap();
    let employee = Employee::new(EmployeeFields::new("Alice", "Engineer", 50000.0).unwrap());
    repo.create_employee(&employee).unwrap();
    repo.close().unwrap();

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let repo = SqliteEmployeeRepository::try_new(conn).unwrap();
    assert_eq!(repo.list_employees().unwrap(), vec![employee]);
}

#[test]
fn close_db_succeeds_on_fresh_connection() {
    let conn = open_db_in_memory().unwrap();
    close_db(conn).unwrap();
}

#[test]
fn opening_missing_directory_fails_before_any_query() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("employeedb.sqlite3");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(err.to_string().starts_with("employee store schema version 999"));
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
