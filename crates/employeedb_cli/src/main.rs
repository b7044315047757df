//! Employee records CLI entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open the store.
//! - Run the menu session on stdin/stdout and close the store afterwards.
//!
//! # Invariants
//! - No menu is shown unless the database opened successfully.
//! - The connection is closed on every path after the session started.

mod config;
mod render;
mod session;

use config::CliConfig;
use employeedb_core::db::open_db;
use employeedb_core::{init_logging, EmployeeService, RepoResult, SqliteEmployeeRepository};
use log::{error, info};
use session::Session;
use std::io;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CliConfig::from_env();

    // Logging is diagnostics only; the tool stays usable without it.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir.to_string_lossy()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let service = match open_service(&config.db_path) {
        Ok(service) => service,
        Err(err) => {
            error!("event=startup module=cli status=error error={err}");
            eprintln!("Connection error: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("Connected to {}", config.db_path.display());

    let mut session = Session::new(service, io::stdin().lock(), io::stdout().lock());
    let outcome = session.run();
    let (service, _stdout) = session.into_parts();
    let closed = service.close();

    if let Err(err) = &closed {
        error!("event=shutdown module=cli status=error error={err}");
        eprintln!("Failed to close database: {err}");
    }
    if let Err(err) = outcome {
        error!("event=session_end module=cli status=error error={err}");
        eprintln!("Terminal error: {err}");
        return ExitCode::FAILURE;
    }
    if closed.is_err() {
        return ExitCode::FAILURE;
    }

    info!("event=shutdown module=cli status=ok");
    ExitCode::SUCCESS
}

fn open_service(db_path: &Path) -> RepoResult<EmployeeService<SqliteEmployeeRepository>> {
    let conn = open_db(db_path)?;
    let repo = SqliteEmployeeRepository::try_new(conn)?;
    Ok(EmployeeService::new(repo))
}
