//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee record and its mutable field set.
//! - Turn raw text input (ids, salaries) into validated values.
//!
//! # Invariants
//! - `id` is stable, never nil, and never reassigned after creation.
//! - `name` and `position` are trimmed and non-blank.
//! - `salary` is finite and non-negative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one employee record.
pub type EmployeeId = Uuid;

/// Validation failures for employee input and persisted state.
#[derive(Debug, Clone, PartialEq)]
pub enum EmployeeValidationError {
    /// The nil UUID is reserved and never identifies a record.
    NilId,
    /// Id text could not be parsed as a UUID.
    InvalidId(String),
    BlankName,
    BlankPosition,
    /// Salary text is not a finite number.
    InvalidSalary(String),
    NegativeSalary(f64),
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "employee id must not be nil"),
            Self::InvalidId(value) => write!(f, "invalid employee id `{value}`"),
            Self::BlankName => write!(f, "name must not be blank"),
            Self::BlankPosition => write!(f, "position must not be blank"),
            Self::InvalidSalary(value) => write!(f, "salary must be a number, got `{value}`"),
            Self::NegativeSalary(value) => write!(f, "salary must not be negative, got {value}"),
        }
    }
}

impl Error for EmployeeValidationError {}

/// Parses user-entered salary text into a numeric value.
///
/// Surrounding whitespace is ignored. Empty, non-numeric, infinite and NaN
/// inputs are rejected rather than coerced.
pub fn parse_salary(input: &str) -> Result<f64, EmployeeValidationError> {
    let trimmed = input.trim();
    let salary = trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| EmployeeValidationError::InvalidSalary(trimmed.to_string()))?;
    validate_salary(salary)?;
    Ok(normalize_zero(salary))
}

/// Parses user-entered id text into an `EmployeeId`.
pub fn parse_employee_id(input: &str) -> Result<EmployeeId, EmployeeValidationError> {
    let trimmed = input.trim();
    let id = Uuid::parse_str(trimmed)
        .map_err(|_| EmployeeValidationError::InvalidId(trimmed.to_string()))?;
    if id.is_nil() {
        return Err(EmployeeValidationError::NilId);
    }
    Ok(id)
}

/// Folds `-0.0` into `0.0` so it never renders as `-0`.
fn normalize_zero(salary: f64) -> f64 {
    if salary == 0.0 {
        0.0
    } else {
        salary
    }
}

fn validate_salary(salary: f64) -> Result<(), EmployeeValidationError> {
    if !salary.is_finite() {
        return Err(EmployeeValidationError::InvalidSalary(salary.to_string()));
    }
    if salary < 0.0 {
        return Err(EmployeeValidationError::NegativeSalary(salary));
    }
    Ok(())
}

/// The mutable part of an employee record.
///
/// Updates replace all three fields at once; there is no partial merge.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeFields {
    pub name: String,
    pub position: String,
    pub salary: f64,
}

impl EmployeeFields {
    /// Builds a field set from already-typed values, trimming text fields.
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        salary: f64,
    ) -> Result<Self, EmployeeValidationError> {
        let fields = Self {
            name: name.into().trim().to_string(),
            position: position.into().trim().to_string(),
            salary: normalize_zero(salary),
        };
        fields.validate()?;
        Ok(fields)
    }

    /// Builds a field set from three raw input lines.
    pub fn parse(
        name: &str,
        position: &str,
        salary: &str,
    ) -> Result<Self, EmployeeValidationError> {
        let salary = parse_salary(salary)?;
        Self::new(name, position, salary)
    }

    /// Validates field-level invariants.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.name.trim().is_empty() {
            return Err(EmployeeValidationError::BlankName);
        }
        if self.position.trim().is_empty() {
            return Err(EmployeeValidationError::BlankPosition);
        }
        validate_salary(self.salary)
    }
}

/// Canonical employee record as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEmployee")]
pub struct Employee {
    /// Assigned once at creation.
    pub id: EmployeeId,
    pub name: String,
    pub position: String,
    pub salary: f64,
}

impl Employee {
    /// Creates a record with a freshly generated id.
    pub fn new(fields: EmployeeFields) -> Self {
        Self::from_parts(Uuid::new_v4(), fields)
    }

    /// Creates a record with a caller-provided id.
    ///
    /// Used by import paths and tests where the identity already exists.
    pub fn with_id(id: EmployeeId, fields: EmployeeFields) -> Result<Self, EmployeeValidationError> {
        let employee = Self::from_parts(id, fields);
        employee.validate()?;
        Ok(employee)
    }

    fn from_parts(id: EmployeeId, fields: EmployeeFields) -> Self {
        Self {
            id,
            name: fields.name,
            position: fields.position,
            salary: fields.salary,
        }
    }

    /// Validates record invariants, including identity.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.id.is_nil() {
            return Err(EmployeeValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(EmployeeValidationError::BlankName);
        }
        if self.position.trim().is_empty() {
            return Err(EmployeeValidationError::BlankPosition);
        }
        validate_salary(self.salary)
    }

    /// Returns a copy of the mutable fields.
    pub fn fields(&self) -> EmployeeFields {
        EmployeeFields {
            name: self.name.clone(),
            position: self.position.clone(),
            salary: self.salary,
        }
    }
}

#[derive(Deserialize)]
struct RawEmployee {
    id: EmployeeId,
    name: String,
    position: String,
    salary: f64,
}

impl TryFrom<RawEmployee> for Employee {
    type Error = EmployeeValidationError;

    fn try_from(raw: RawEmployee) -> Result<Self, Self::Error> {
        let employee = Self {
            id: raw.id,
            name: raw.name,
            position: raw.position,
            salary: raw.salary,
        };
        employee.validate()?;
        Ok(employee)
    }
}

/// Ordering for salary listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}
