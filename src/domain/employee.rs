//! Employee value object
//!
//! Architecture: Value Object - an Employee is validated once at construction and never mutated
//! - Identity is the employee id alone; name and salary do not take part in equality
//! - The root of the hierarchy is the single employee without a manager

use crate::domain::violations::{OrgError, OrgResult};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single record from the employee roster
#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    id: String,
    name: String,
    salary: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    manager_id: Option<String>,
}

impl Employee {
    /// Create a validated employee
    ///
    /// Id, name and manager id are trimmed. A manager id that is empty after
    /// trimming marks the employee as the root of the hierarchy.
    pub fn new(
        id: impl AsRef<str>,
        name: impl AsRef<str>,
        salary: f64,
        manager_id: Option<&str>,
    ) -> OrgResult<Self> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(OrgError::invalid_employee("id", "employee id cannot be empty"));
        }

        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(OrgError::invalid_employee("name", "employee name cannot be empty"));
        }

        if !salary.is_finite() || salary <= 0.0 {
            return Err(OrgError::invalid_employee(
                "salary",
                format!("salary must be a positive number, got {salary}"),
            ));
        }

        let manager_id = manager_id
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            salary,
            manager_id,
        })
    }

    /// Create a root employee (no manager)
    pub fn root(id: impl AsRef<str>, name: impl AsRef<str>, salary: f64) -> OrgResult<Self> {
        Self::new(id, name, salary, None)
    }

    /// Create an employee reporting to `manager_id`
    pub fn reporting_to(
        id: impl AsRef<str>,
        name: impl AsRef<str>,
        salary: f64,
        manager_id: &str,
    ) -> OrgResult<Self> {
        Self::new(id, name, salary, Some(manager_id))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn salary(&self) -> f64 {
        self.salary
    }

    /// Id of the direct manager, `None` for the root
    pub fn manager_id(&self) -> Option<&str> {
        self.manager_id.as_deref()
    }

    /// Whether this employee sits at the top of the hierarchy
    pub fn is_root(&self) -> bool {
        self.manager_id.is_none()
    }

    #[cfg(test)]
    pub(crate) fn set_manager_unchecked(&mut self, manager_id: Option<String>) {
        self.manager_id = manager_id;
    }
}

impl PartialEq for Employee {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Employee {}

impl Hash for Employee {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}
