//! Core domain logic for the employee records tool.
//! This crate owns the record invariants and the storage gateway.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging};
pub use model::employee::{
    parse_employee_id, parse_salary, Employee, EmployeeFields, EmployeeId,
    EmployeeValidationError, SortDirection,
};
pub use repo::employee_repo::{
    EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository,
};
pub use service::employee_service::EmployeeService;
