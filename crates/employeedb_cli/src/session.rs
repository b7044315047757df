//! Interactive menu session.
//!
//! # Responsibility
//! - Present the numbered menu, collect fields, dispatch to the service.
//! - Report every outcome and return to the menu.
//!
//! # Invariants
//! - One prompt or storage call in flight at a time.
//! - Storage and validation errors never escape the loop; only I/O errors on
//!   the terminal itself do.
//! - The service is never called until every field of an action is read.

use crate::render::{employee_lines, employee_summary, salary_lines};
use employeedb_core::{
    parse_employee_id, EmployeeFields, EmployeeRepository, EmployeeService, RepoError,
    SortDirection,
};
use log::{debug, info};
use std::io::{self, BufRead, Write};

pub const MENU: &str = "
--- Employee Management ---
1. Add Employee
2. View All Employees
3. Update Employee
4. Delete Employee
5. Sort Salary Ascending
6. Sort Salary Descending
7. Exit
---------------------------";
pub const MENU_PROMPT: &str = "Choose an option (1-7): ";

/// A parsed menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    View,
    Update,
    Delete,
    Sort(SortDirection),
    Exit,
}

impl MenuChoice {
    /// Parses one menu line; anything other than `1`-`7` is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::View),
            "3" => Some(Self::Update),
            "4" => Some(Self::Delete),
            "5" => Some(Self::Sort(SortDirection::Ascending)),
            "6" => Some(Self::Sort(SortDirection::Descending)),
            "7" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user picked Exit.
    Exit,
    /// Input closed before Exit was chosen.
    EndOfInput,
}

enum Flow {
    Continue,
    EndOfInput,
}

/// Menu loop over a service, an input reader and an output writer.
pub struct Session<R: EmployeeRepository, I: BufRead, W: Write> {
    service: EmployeeService<R>,
    input: I,
    output: W,
}

impl<R: EmployeeRepository, I: BufRead, W: Write> Session<R, I, W> {
    pub fn new(service: EmployeeService<R>, input: I, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Runs until Exit or end of input.
    ///
    /// # Errors
    /// Only terminal read/write failures are returned.
    pub fn run(&mut self) -> io::Result<SessionEnd> {
        info!("event=session_start module=cli status=ok");
        let end = self.run_loop()?;
        info!("event=session_end module=cli status=ok reason={end:?}");
        Ok(end)
    }

    /// Hands back the service (for teardown) and the output writer.
    pub fn into_parts(self) -> (EmployeeService<R>, W) {
        (self.service, self.output)
    }

    fn run_loop(&mut self) -> io::Result<SessionEnd> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(line) = self.prompt(MENU_PROMPT)? else {
                return Ok(SessionEnd::EndOfInput);
            };

            let Some(choice) = MenuChoice::parse(&line) else {
                debug!("event=session_invalid_choice module=cli status=rejected");
                writeln!(self.output, "Invalid choice.")?;
                continue;
            };

            let flow = match choice {
                MenuChoice::Exit => {
                    writeln!(self.output, "Exiting...")?;
                    return Ok(SessionEnd::Exit);
                }
                MenuChoice::Add => self.add_employee()?,
                MenuChoice::View => self.view_employees()?,
                MenuChoice::Update => self.update_employee()?,
                MenuChoice::Delete => self.delete_employee()?,
                MenuChoice::Sort(direction) => self.sort_by_salary(direction)?,
            };

            if let Flow::EndOfInput = flow {
                return Ok(SessionEnd::EndOfInput);
            }
        }
    }

    /// Writes a prompt and reads one trimmed line; `None` on end of input.
    ///
    /// Invalid UTF-8 is decoded lossily rather than treated as a terminal error.
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }

    fn add_employee(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Name: ")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(position) = self.prompt("Position: ")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(salary) = self.prompt("Salary: ")? else {
            return Ok(Flow::EndOfInput);
        };

        let fields = match EmployeeFields::parse(&name, &position, &salary) {
            Ok(fields) => fields,
            Err(err) => {
                writeln!(self.output, "Invalid input: {err}")?;
                return Ok(Flow::Continue);
            }
        };

        match self.service.add_employee(fields) {
            Ok(employee) => writeln!(self.output, "Employee added. ID: {}", employee.id)?,
            Err(err) => writeln!(self.output, "Failed: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn view_employees(&mut self) -> io::Result<Flow> {
        match self.service.list_employees() {
            Ok(employees) => {
                writeln!(self.output, "\nEmployee List:")?;
                for line in employee_lines(&employees) {
                    writeln!(self.output, "{line}")?;
                }
            }
            Err(err) => writeln!(self.output, "Fetch failed: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn update_employee(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt("Enter Employee ID to update: ")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(name) = self.prompt("New Name: ")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(position) = self.prompt("New Position: ")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(salary) = self.prompt("New Salary: ")? else {
            return Ok(Flow::EndOfInput);
        };

        let parsed = parse_employee_id(&id)
            .and_then(|id| EmployeeFields::parse(&name, &position, &salary).map(|f| (id, f)));
        let (id, fields) = match parsed {
            Ok(parsed) => parsed,
            Err(err) => {
                writeln!(self.output, "Invalid input: {err}")?;
                return Ok(Flow::Continue);
            }
        };

        match self.service.update_employee(id, &fields) {
            Ok(employee) => {
                writeln!(self.output, "Updated.")?;
                writeln!(self.output, "{}", employee_summary(&employee))?;
            }
            Err(RepoError::NotFound(_)) => writeln!(self.output, "Not found.")?,
            Err(err) => writeln!(self.output, "Update error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn delete_employee(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt("Enter Employee ID to delete: ")? else {
            return Ok(Flow::EndOfInput);
        };

        let id = match parse_employee_id(&id) {
            Ok(id) => id,
            Err(err) => {
                writeln!(self.output, "Invalid input: {err}")?;
                return Ok(Flow::Continue);
            }
        };

        match self.service.delete_employee(id) {
            Ok(employee) => {
                writeln!(self.output, "Deleted.")?;
                writeln!(self.output, "{}", employee_summary(&employee))?;
            }
            Err(RepoError::NotFound(_)) => writeln!(self.output, "Not found.")?,
            Err(err) => writeln!(self.output, "Delete error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn sort_by_salary(&mut self, direction: SortDirection) -> io::Result<Flow> {
        match self.service.list_by_salary(direction) {
            Ok(employees) => {
                let label = match direction {
                    SortDirection::Ascending => "ascending",
                    SortDirection::Descending => "descending",
                };
                writeln!(self.output, "\nEmployees Sorted by Salary ({label}):")?;
                for line in salary_lines(&employees) {
                    writeln!(self.output, "{line}")?;
                }
            }
            Err(err) => writeln!(self.output, "Sort error: {err}")?,
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::{MenuChoice, Session, SessionEnd, MENU};
    use employeedb_core::db::open_db_in_memory;
    use employeedb_core::{
        Employee, EmployeeFields, EmployeeService, SortDirection, SqliteEmployeeRepository,
    };
    use std::io::Cursor;

    type TestService = EmployeeService<SqliteEmployeeRepository>;

    fn service() -> TestService {
        let conn = open_db_in_memory().unwrap();
        EmployeeService::new(SqliteEmployeeRepository::try_new(conn).unwrap())
    }

    fn seed(service: &TestService, name: &str, salary: f64) -> Employee {
        service
            .add_employee(EmployeeFields::new(name, "Staff", salary).unwrap())
            .unwrap()
    }

    fn run_script(service: TestService, script: &str) -> (SessionEnd, TestService, String) {
        let mut session = Session::new(service, Cursor::new(script.to_string()), Vec::new());
        let end = session.run().unwrap();
        let (service, output) = session.into_parts();
        (end, service, String::from_utf8(output).unwrap())
    }

    fn menu_count(output: &str) -> usize {
        output.matches("--- Employee Management ---").count()
    }

    #[test]
    fn menu_choice_parses_only_one_through_seven() {
        assert_eq!(MenuChoice::parse(" 1 "), Some(MenuChoice::Add));
        assert_eq!(
            MenuChoice::parse("6"),
            Some(MenuChoice::Sort(SortDirection::Descending))
        );
        assert_eq!(MenuChoice::parse("7"), Some(MenuChoice::Exit));
        for input in ["0", "8", "9", "abc", "", "1 2"] {
            assert_eq!(MenuChoice::parse(input), None, "input `{input}`");
        }
    }

    #[test]
    fn add_then_view_lists_new_record() {
        let (end, service, output) =
            run_script(service(), "1\nAlice\nEngineer\n50000\n2\n7\n");

        assert_eq!(end, SessionEnd::Exit);
        assert!(output.contains("Employee added."));
        assert!(output.contains("1. Alice | Engineer | ₹50000 | ID: "));

        let all = service.list_employees().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Alice");
        assert_eq!(all[0].salary, 50000.0);
    }

    #[test]
    fn non_numeric_salary_is_rejected_without_storage_call() {
        let (_, service, output) = run_script(service(), "1\nAlice\nEngineer\nlots\n7\n");

        assert!(output.contains("Invalid input: salary must be a number"));
        assert!(service.list_employees().unwrap().is_empty());
        assert_eq!(menu_count(&output), 2);
    }

    #[test]
    fn negative_zero_salary_is_stored_and_shown_as_zero() {
        let (_, service, output) = run_script(service(), "1\nDan\nIntern\n-0\n2\n7\n");

        assert!(output.contains("1. Dan | Intern | ₹0 | ID: "));
        assert!(!output.contains("₹-0"));
        let stored = service.list_employees().unwrap();
        assert!(stored[0].salary.is_sign_positive());
    }

    #[test]
    fn update_known_id_overwrites_fields() {
        let service = service();
        let existing = seed(&service, "Alice", 50000.0);

        let script = format!("3\n{}\nAlice Smith\nLead\n70000\n7\n", existing.id);
        let (_, service, output) = run_script(service, &script);

        assert!(output.contains("Updated."));
        let loaded = service.get_employee(existing.id).unwrap().unwrap();
        assert_eq!(
            loaded.fields(),
            EmployeeFields::new("Alice Smith", "Lead", 70000.0).unwrap()
        );
    }

    #[test]
    fn update_unknown_id_reports_not_found() {
        let service = service();
        let existing = seed(&service, "Alice", 50000.0);

        let script = format!("3\n{}\nBob\nClerk\n1\n7\n", uuid::Uuid::new_v4());
        let (_, service, output) = run_script(service, &script);

        assert!(output.contains("Not found."));
        assert_eq!(service.list_employees().unwrap(), vec![existing]);
    }

    #[test]
    fn delete_twice_reports_not_found_the_second_time() {
        let service = service();
        let keep = seed(&service, "Alice", 1.0);
        let remove = seed(&service, "Bob", 2.0);

        let script = format!("4\n{id}\n4\n{id}\n7\n", id = remove.id);
        let (_, service, output) = run_script(service, &script);

        assert_eq!(output.matches("Deleted.").count(), 1);
        assert_eq!(output.matches("Not found.").count(), 1);
        assert_eq!(service.list_employees().unwrap(), vec![keep]);
    }

    #[test]
    fn malformed_id_is_rejected_as_invalid_input() {
        let service = service();
        seed(&service, "Alice", 1.0);

        let (_, service, output) = run_script(service, "4\nnot-an-id\n7\n");

        assert!(output.contains("Invalid input: invalid employee id `not-an-id`"));
        assert_eq!(service.list_employees().unwrap().len(), 1);
    }

    #[test]
    fn sort_options_print_salary_listings() {
        let service = service();
        seed(&service, "High", 300.0);
        seed(&service, "Low", 100.0);

        let (_, _, output) = run_script(service, "5\n6\n7\n");

        let ascending = output.find("1. Low | ₹100").unwrap();
        let descending = output.find("1. High | ₹300").unwrap();
        assert!(ascending < descending);
        assert!(output.contains("Employees Sorted by Salary (ascending):"));
        assert!(output.contains("Employees Sorted by Salary (descending):"));
    }

    #[test]
    fn sort_on_empty_store_prints_placeholder() {
        let (_, _, output) = run_script(service(), "5\n7\n");
        assert!(output.contains("No employees found."));
    }

    #[test]
    fn invalid_choice_redisplays_menu_and_changes_nothing() {
        let service = service();
        let existing = seed(&service, "Alice", 1.0);

        let (end, service, output) = run_script(service, "9\nabc\n7\n");

        assert_eq!(end, SessionEnd::Exit);
        assert_eq!(output.matches("Invalid choice.").count(), 2);
        assert_eq!(menu_count(&output), 3);
        assert_eq!(service.list_employees().unwrap(), vec![existing]);
    }

    #[test]
    fn exit_performs_no_mutation() {
        let service = service();
        let existing = seed(&service, "Alice", 1.0);

        let (end, service, output) = run_script(service, "7\n");

        assert_eq!(end, SessionEnd::Exit);
        assert!(output.starts_with(MENU));
        assert!(output.contains("Exiting..."));
        assert_eq!(service.list_employees().unwrap(), vec![existing]);
        service.close().unwrap();
    }

    #[test]
    fn invalid_utf8_menu_line_is_an_invalid_choice() {
        let input = Cursor::new(b"\xff\xfe\n7\n".to_vec());
        let mut session = Session::new(service(), input, Vec::new());

        let end = session.run().unwrap();
        let (_, output) = session.into_parts();
        let output = String::from_utf8(output).unwrap();

        assert_eq!(end, SessionEnd::Exit);
        assert_eq!(output.matches("Invalid choice.").count(), 1);
        assert_eq!(menu_count(&output), 2);
    }

    #[test]
    fn invalid_utf8_salary_is_rejected_as_invalid_input() {
        let mut script = b"1\nAlice\nEngineer\n".to_vec();
        script.extend_from_slice(b"5\xc3\x28\n7\n");
        let mut session = Session::new(service(), Cursor::new(script), Vec::new());

        let end = session.run().unwrap();
        let (service, output) = session.into_parts();
        let output = String::from_utf8(output).unwrap();

        assert_eq!(end, SessionEnd::Exit);
        assert!(output.contains("Invalid input: salary must be a number"));
        assert!(service.list_employees().unwrap().is_empty());
    }

    #[test]
    fn storage_failures_are_reported_and_return_to_menu() {
        let service = service();
        let existing = seed(&service, "Alice", 1.0);
        service
            .repository()
            .connection()
            .execute_batch("DROP TABLE employees;")
            .unwrap();

        let script = format!(
            "1\nBob\nClerk\n2\n2\n5\n6\n3\n{id}\nAlice\nLead\n3\n4\n{id}\n7\n",
            id = existing.id
        );
        let (end, _, output) = run_script(service, &script);

        assert_eq!(end, SessionEnd::Exit);
        assert!(output.contains("Failed: no such table: employees"));
        assert!(output.contains("Fetch failed: no such table: employees"));
        assert_eq!(output.matches("Sort error: no such table: employees").count(), 2);
        assert!(output.contains("Update error: no such table: employees"));
        assert!(output.contains("Delete error: no such table: employees"));
        // Initial menu, one after each of the six actions.
        assert_eq!(menu_count(&output), 7);
        assert!(!output.contains("Not found."));
    }

    #[test]
    fn end_of_input_mid_action_ends_session_without_writing() {
        let (end, service, _) = run_script(service(), "1\nAlice\n");

        assert_eq!(end, SessionEnd::EndOfInput);
        assert!(service.list_employees().unwrap().is_empty());
    }
}
