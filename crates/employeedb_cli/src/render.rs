//! Text formatting for employee listings.
//!
//! Pure functions: callers decide where the lines go.

use employeedb_core::Employee;

pub const CURRENCY_SYMBOL: &str = "₹";
pub const EMPTY_LISTING: &str = "No employees found.";

/// Formats a record as `name | position | ₹salary | ID: id`.
pub fn employee_summary(employee: &Employee) -> String {
    format!(
        "{} | {} | {CURRENCY_SYMBOL}{} | ID: {}",
        employee.name, employee.position, employee.salary, employee.id
    )
}

/// One numbered line per record with every field.
pub fn employee_lines(employees: &[Employee]) -> Vec<String> {
    numbered(employees, employee_summary)
}

/// One numbered line per record with name and salary only.
pub fn salary_lines(employees: &[Employee]) -> Vec<String> {
    numbered(employees, |employee| {
        format!("{} | {CURRENCY_SYMBOL}{}", employee.name, employee.salary)
    })
}

fn numbered(employees: &[Employee], line: impl Fn(&Employee) -> String) -> Vec<String> {
    if employees.is_empty() {
        return vec![EMPTY_LISTING.to_string()];
    }
    employees
        .iter()
        .enumerate()
        .map(|(index, employee)| format!("{}. {}", index + 1, line(employee)))
        .collect()
}
