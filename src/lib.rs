//! Org Audit - management hierarchy validation and policy analysis
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure domain logic separated from file and terminal concerns
//! - The hierarchy is built and validated once, then queried read-only
//! - Salary and reporting-line analyses are independent of each other

pub mod analyzer;
pub mod config;
pub mod domain;
pub mod hierarchy;
pub mod report;
pub mod roster;

// Re-export main types for convenient access
pub use domain::{
    AuditReport, AuditSummary, Employee, OrgError, OrgResult, ReportingLineAnalysis,
    ReportingLineViolation, RootCandidate, SalaryAnalysis, SalaryViolation, SalaryViolationKind,
};

pub use config::{AuditConfig, ConfigBuilder, ReportingPolicy, SalaryPolicy};

pub use hierarchy::{build_hierarchy, Hierarchy, HierarchyBuilder};

pub use analyzer::{
    analyze_reporting_lines, analyze_salaries, chain_of_command, count_managers_to_root,
    AnalysisOptions, HierarchyAnalyzer,
};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

pub use roster::{parse_roster, read_employees, read_roster, Roster};

use std::path::Path;

/// Main auditor providing high-level roster operations
pub struct OrgAuditor {
    builder: HierarchyBuilder,
    analyzer: HierarchyAnalyzer,
    report_formatter: ReportFormatter,
}

/// Options for an audit run
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    pub analysis_options: AnalysisOptions,
}

impl OrgAuditor {
    /// Create a new auditor with the given configuration
    pub fn new_with_config(config: AuditConfig) -> OrgResult<Self> {
        config.validate()?;
        Ok(Self {
            builder: HierarchyBuilder::new(),
            analyzer: HierarchyAnalyzer::new(config),
            report_formatter: ReportFormatter::default(),
        })
    }

    /// Create an auditor with default policies
    pub fn new() -> OrgResult<Self> {
        Self::new_with_config(AuditConfig::default())
    }

    /// Create an auditor loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> OrgResult<Self> {
        let config = AuditConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    pub fn config(&self) -> &AuditConfig {
        self.analyzer.config()
    }

    /// Validate a roster and build its hierarchy
    pub fn build<I>(&self, employees: I) -> OrgResult<Hierarchy>
    where
        I: IntoIterator<Item = Employee>,
    {
        self.builder.build(employees)
    }

    /// Build the hierarchy for `employees` and run both analyses
    pub fn audit_employees<I>(&self, employees: I, options: &AuditOptions) -> OrgResult<AuditReport>
    where
        I: IntoIterator<Item = Employee>,
    {
        let hierarchy = self.build(employees)?;
        self.analyzer.analyze(&hierarchy, &options.analysis_options)
    }

    /// Read a roster file and audit it
    pub fn audit_file<P: AsRef<Path>>(&self, path: P, options: &AuditOptions) -> OrgResult<AuditReport> {
        let roster = read_roster(path)?;
        let mut report = self.audit_employees(roster.employees, options)?;
        report.set_source_digest(roster.digest);
        Ok(report)
    }

    /// Format an audit report for output
    pub fn format_report(&self, report: &AuditReport, format: OutputFormat) -> OrgResult<String> {
        self.report_formatter.format_report(report, format)
    }
}

/// Convenience function to audit a roster file with default settings
pub fn audit_file<P: AsRef<Path>>(path: P) -> OrgResult<AuditReport> {
    OrgAuditor::new()?.audit_file(path, &AuditOptions::default())
}

/// Convenience function to audit in-memory employees with default settings
pub fn audit_employees(employees: Vec<Employee>) -> OrgResult<AuditReport> {
    OrgAuditor::new()?.audit_employees(employees, &AuditOptions::default())
}
