//! Core domain models for policy violations and audit results
//!
//! Architecture: Rich Domain Models - Violations carry the facts needed to explain themselves
//! - SalaryViolation knows which bound was crossed and by how much
//! - AuditReport acts as an aggregate root over both analyses
//! - OrgError keeps structured fields so callers can branch on the kind of failure

use crate::domain::employee::Employee;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Which side of the salary band a manager falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryViolationKind {
    /// Earning less than the minimum premium over direct reports
    Underpaid,
    /// Earning more than the maximum premium over direct reports
    Overpaid,
}

impl SalaryViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Underpaid => "underpaid",
            Self::Overpaid => "overpaid",
        }
    }
}

/// A manager whose salary falls outside the allowed band
#[derive(Debug, Clone, Serialize)]
pub struct SalaryViolation {
    /// The offending manager
    pub manager: Employee,
    /// Shortage or excess relative to the crossed bound, always positive
    pub amount: f64,
    /// Average salary of the manager's direct reports
    pub subordinate_average: f64,
    pub kind: SalaryViolationKind,
}

impl SalaryViolation {
    pub fn underpaid(manager: Employee, amount: f64, subordinate_average: f64) -> Self {
        Self {
            manager,
            amount,
            subordinate_average,
            kind: SalaryViolationKind::Underpaid,
        }
    }

    pub fn overpaid(manager: Employee, amount: f64, subordinate_average: f64) -> Self {
        Self {
            manager,
            amount,
            subordinate_average,
            kind: SalaryViolationKind::Overpaid,
        }
    }

    /// The band bound that was crossed: the minimum for underpaid managers,
    /// the maximum for overpaid ones
    pub fn expected_salary(&self) -> f64 {
        match self.kind {
            SalaryViolationKind::Underpaid => self.manager.salary() + self.amount,
            SalaryViolationKind::Overpaid => self.manager.salary() - self.amount,
        }
    }
}

/// An employee with too many managers between them and the root
#[derive(Debug, Clone, Serialize)]
pub struct ReportingLineViolation {
    pub employee: Employee,
    /// Number of managers between the employee and the root, root included
    pub total_managers: usize,
    /// How far `total_managers` exceeds the allowed maximum
    pub excess_managers: usize,
}

/// Result of the salary analysis, both lists in roster order
#[derive(Debug, Clone, Default, Serialize)]
pub struct SalaryAnalysis {
    pub underpaid: Vec<SalaryViolation>,
    pub overpaid: Vec<SalaryViolation>,
    /// Number of employees with at least one direct report
    pub managers_evaluated: usize,
}

impl SalaryAnalysis {
    pub fn total(&self) -> usize {
        self.underpaid.len() + self.overpaid.len()
    }

    pub fn is_compliant(&self) -> bool {
        self.total() == 0
    }
}

/// Result of the reporting-line analysis in roster order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportingLineAnalysis {
    pub violations: Vec<ReportingLineViolation>,
    /// Threshold the violations were measured against
    pub max_managers: usize,
}

impl ReportingLineAnalysis {
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Summary statistics for an audit run
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditSummary {
    pub total_employees: usize,
    pub managers_evaluated: usize,
    pub underpaid_count: usize,
    pub overpaid_count: usize,
    pub reporting_line_count: usize,
    pub execution_time_ms: u64,
    pub analyzed_at: DateTime<Utc>,
}

impl AuditSummary {
    pub fn total_violations(&self) -> usize {
        self.underpaid_count + self.overpaid_count + self.reporting_line_count
    }
}

/// Complete result of auditing one roster
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub root: Employee,
    pub salaries: SalaryAnalysis,
    pub reporting_lines: ReportingLineAnalysis,
    pub summary: AuditSummary,
    /// Fingerprint of the policy configuration used
    pub config_fingerprint: Option<String>,
    /// SHA-256 of the roster source, when it was read from a file
    pub source_digest: Option<String>,
}

impl AuditReport {
    pub fn new(
        root: Employee,
        total_employees: usize,
        salaries: SalaryAnalysis,
        reporting_lines: ReportingLineAnalysis,
    ) -> Self {
        let summary = AuditSummary {
            total_employees,
            managers_evaluated: salaries.managers_evaluated,
            underpaid_count: salaries.underpaid.len(),
            overpaid_count: salaries.overpaid.len(),
            reporting_line_count: reporting_lines.violations.len(),
            execution_time_ms: 0,
            analyzed_at: Utc::now(),
        };

        Self {
            root,
            salaries,
            reporting_lines,
            summary,
            config_fingerprint: None,
            source_digest: None,
        }
    }

    pub fn has_violations(&self) -> bool {
        self.summary.total_violations() > 0
    }

    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    pub fn set_config_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.config_fingerprint = Some(fingerprint.into());
    }

    pub fn set_source_digest(&mut self, digest: impl Into<String>) {
        self.source_digest = Some(digest.into());
    }
}

/// One of several employees competing for the root position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootCandidate {
    pub id: String,
    pub name: String,
}

impl fmt::Display for RootCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}

fn join_candidates(candidates: &[RootCandidate]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error types that can occur while loading or auditing a roster
#[derive(Debug, thiserror::Error)]
pub enum OrgError {
    /// No employee lacks a manager
    #[error("No CEO found (employee with no manager)")]
    MissingRoot,

    /// More than one employee lacks a manager
    #[error("Multiple CEOs found: {}", join_candidates(.candidates))]
    MultipleRoots { candidates: Vec<RootCandidate> },

    /// A manager reference does not resolve
    #[error("Employee {employee_id} references non-existent manager {manager_id}")]
    UnknownManager {
        employee_id: String,
        manager_id: String,
    },

    /// Two roster entries share an id
    #[error("Duplicate employee id {id}")]
    DuplicateId { id: String },

    /// Following manager references from an employee revisits someone
    #[error("Circular reference detected in reporting line for employee {employee_id}")]
    CyclicReportingLine { employee_id: String },

    /// A record failed value validation
    #[error("Invalid employee {field}: {reason}")]
    InvalidEmployee { field: &'static str, reason: String },

    /// A roster line could not be decoded
    #[error("Error parsing line {line}: {content}. Error: {message}")]
    Parse {
        line: usize,
        content: String,
        message: String,
    },

    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Report rendering failed
    #[error("Report error: {message}")]
    Report { message: String },
}

impl OrgError {
    pub fn invalid_employee(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidEmployee {
            field,
            reason: reason.into(),
        }
    }

    pub fn parse(line: usize, content: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            content: content.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }

    /// Whether this error describes an invalid hierarchy shape
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingRoot
                | Self::MultipleRoots { .. }
                | Self::UnknownManager { .. }
                | Self::DuplicateId { .. }
                | Self::CyclicReportingLine { .. }
        )
    }
}

/// Result type for org-audit operations
pub type OrgResult<T> = Result<T, OrgError>;
