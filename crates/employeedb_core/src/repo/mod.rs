//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage gateway contract for employee records.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod employee_repo;
