//! Employee use-case service.
//!
//! # Responsibility
//! - Provide the add/view/update/delete/sort entry points used by the CLI.
//! - Emit metadata-only diagnostic events for each storage call.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Log lines carry ids and counts only, never names or salaries.

use crate::model::employee::{Employee, EmployeeFields, EmployeeId, SortDirection};
use crate::repo::employee_repo::{EmployeeRepository, RepoError, RepoResult};
use log::{info, warn};

/// Use-case service wrapper over an employee storage gateway.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates a record with a new id and returns it as persisted.
    pub fn add_employee(&self, fields: EmployeeFields) -> RepoResult<Employee> {
        let employee = Employee::new(fields);
        let result = self.repo.create_employee(&employee);
        log_outcome("employee_create", employee.id, &result);
        result.map(|_| employee)
    }

    /// Gets one record by id.
    pub fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.repo.get_employee(id)
    }

    /// Lists all records in storage order.
    pub fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let result = self.repo.list_employees();
        log_list("all", &result);
        result
    }

    /// Lists all records ordered by salary.
    pub fn list_by_salary(&self, direction: SortDirection) -> RepoResult<Vec<Employee>> {
        let result = self.repo.list_employees_by_salary(direction);
        let order = match direction {
            SortDirection::Ascending => "salary_asc",
            SortDirection::Descending => "salary_desc",
        };
        log_list(order, &result);
        result
    }

    /// Overwrites name, position and salary of an existing record.
    ///
    /// Returns `RepoError::NotFound` when no record has this id.
    pub fn update_employee(&self, id: EmployeeId, fields: &EmployeeFields) -> RepoResult<Employee> {
        let result = self.repo.update_employee(id, fields);
        log_outcome("employee_update", id, &result);
        result
    }

    /// Deletes a record and returns what was removed.
    pub fn delete_employee(&self, id: EmployeeId) -> RepoResult<Employee> {
        let result = self.repo.delete_employee(id);
        log_outcome("employee_delete", id, &result);
        result
    }

    /// Consumes the service and closes the storage connection.
    pub fn close(self) -> RepoResult<()> {
        self.repo.close()
    }
}

fn log_outcome<T>(event: &str, id: EmployeeId, result: &RepoResult<T>) {
    match result {
        Ok(_) => info!("event={event} module=service status=ok id={id}"),
        Err(RepoError::NotFound(_)) => {
            info!("event={event} module=service status=not_found id={id}")
        }
        // Validation messages can echo user input.
        Err(RepoError::Validation(_)) => {
            info!("event={event} module=service status=rejected id={id}")
        }
        Err(err) => warn!("event={event} module=service status=error id={id} error={err}"),
    }
}

fn log_list(order: &str, result: &RepoResult<Vec<Employee>>) {
    match result {
        Ok(items) => info!(
            "event=employee_list module=service status=ok order={order} count={}",
            items.len()
        ),
        Err(err) => warn!("event=employee_list module=service status=error order={order} error={err}"),
    }
}
