//! Domain layer for Org Audit
//!
//! CDD Principle: Domain Model - Pure business logic for organizational policy checks
//! - Contains the employee value object, violation records and the error taxonomy
//! - Independent of file systems, terminals and configuration formats

pub mod employee;
pub mod violations;

// Re-export main domain types for convenience
pub use employee::Employee;
pub use violations::*;
