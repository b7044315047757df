//! Employee domain model.
//!
//! # Responsibility
//! - Define the record shape shared by storage, service and CLI layers.
//! - Own parsing of raw text input into typed, validated values.
//!
//! # Invariants
//! - Every persisted record carries a non-nil `EmployeeId`.

pub mod employee;
