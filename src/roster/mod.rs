//! Roster loading from delimited text
//!
//! Architecture: Infrastructure Layer - turns `id,name,salary,managerId` lines into Employees
//! - The first non-blank line is a header and is skipped
//! - Double quotes toggle quoting so names may contain commas; the quotes are dropped
//! - Errors carry the 1-based line number and the offending line

use crate::domain::{Employee, OrgError, OrgResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Number of columns in a roster record
pub const FIELD_COUNT: usize = 4;

/// Employees read from one source, with a digest of the raw bytes
#[derive(Debug, Clone)]
pub struct Roster {
    pub employees: Vec<Employee>,
    /// Hex SHA-256 of the source content
    pub digest: String,
}

/// Read and parse a roster file
pub fn read_roster<P: AsRef<Path>>(path: P) -> OrgResult<Roster> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let employees = parse_roster(&content)?;

    tracing::info!(
        "Loaded {} employees from {}",
        employees.len(),
        path.display()
    );

    Ok(Roster {
        employees,
        digest: content_digest(&content),
    })
}

/// Read a roster file and return only the employees
pub fn read_employees<P: AsRef<Path>>(path: P) -> OrgResult<Vec<Employee>> {
    read_roster(path).map(|roster| roster.employees)
}

/// Parse roster text, skipping blank lines and the header
pub fn parse_roster(content: &str) -> OrgResult<Vec<Employee>> {
    let mut employees = Vec::new();
    let mut header_seen = false;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }

        let employee =
            parse_record(line).map_err(|e| OrgError::parse(idx + 1, line, record_error_message(e)))?;
        employees.push(employee);
    }

    Ok(employees)
}

/// Parse a single `id,name,salary,managerId` record
pub fn parse_record(line: &str) -> OrgResult<Employee> {
    let fields = split_fields(line);
    if fields.len() != FIELD_COUNT {
        return Err(OrgError::parse(
            0,
            line,
            format!(
                "Expected {FIELD_COUNT} fields (id,name,salary,managerId) but found {}",
                fields.len()
            ),
        ));
    }

    let salary: f64 = fields[2]
        .parse()
        .map_err(|_| OrgError::parse(0, line, format!("Invalid salary format: {}", fields[2])))?;

    Employee::new(&fields[0], &fields[1], salary, Some(fields[3].as_str()))
}

/// Hex SHA-256 of `content`
pub fn content_digest(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

// Record-level errors are rewrapped with the real line number, keep only their detail
fn record_error_message(err: OrgError) -> String {
    match err {
        OrgError::Parse { message, .. } => message,
        other => other.to_string(),
    }
}
