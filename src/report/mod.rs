//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - AuditReport (domain) is converted to console text or JSON
//! - Each formatter encapsulates the rules for its specific output format

use crate::domain::{AuditReport, OrgError, OrgResult, SalaryViolation, SalaryViolationKind};
use std::io::Write;

/// Supported output formats for audit reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable console report
    Human,
    /// JSON format for programmatic consumption
    Json,
}

impl OutputFormat {
    /// Parse format from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json"]
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Whether to print the direct-report average under each salary violation
    pub show_averages: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_averages: true,
        }
    }
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format an audit report in the specified format
    pub fn format_report(&self, report: &AuditReport, format: OutputFormat) -> OrgResult<String> {
        match format {
            OutputFormat::Human => Ok(self.format_human(report)),
            OutputFormat::Json => self.format_json(report),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &AuditReport,
        format: OutputFormat,
        mut writer: W,
    ) -> OrgResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn format_human(&self, report: &AuditReport) -> String {
        let mut output = String::new();
        let max_managers = report.reporting_lines.max_managers;

        output.push_str(&format!(
            "Analyzed {} employees (CEO: {})\n\n",
            report.summary.total_employees, report.root
        ));

        output.push_str(&self.heading("=== SALARY ANALYSIS ==="));
        self.push_salary_section(
            &mut output,
            &report.salaries.underpaid,
            "No managers earning less than they should.",
            "Managers earning LESS than they should:",
        );
        self.push_salary_section(
            &mut output,
            &report.salaries.overpaid,
            "No managers earning more than they should.",
            "Managers earning MORE than they should:",
        );

        output.push_str(&self.heading("=== REPORTING LINE ANALYSIS ==="));
        let violations = &report.reporting_lines.violations;
        if violations.is_empty() {
            output.push_str(&self.ok(&format!(
                "No employees with reporting lines longer than {max_managers} managers."
            )));
        } else {
            output.push_str(&self.warn(&format!(
                "Employees with reporting lines longer than {max_managers} managers:"
            )));
            for violation in violations {
                output.push_str(&format!(
                    "  • {}: {} managers to CEO ({} more than recommended)\n",
                    violation.employee, violation.total_managers, violation.excess_managers
                ));
            }
        }
        output.push('\n');

        output.push_str(&self.format_summary(report));
        output
    }

    fn push_salary_section(
        &self,
        output: &mut String,
        violations: &[SalaryViolation],
        clean: &str,
        title: &str,
    ) {
        if violations.is_empty() {
            output.push_str(&self.ok(clean));
        } else {
            output.push_str(&self.warn(title));
            for violation in violations {
                let (bound, label) = match violation.kind {
                    SalaryViolationKind::Underpaid => ("at least", "shortage"),
                    SalaryViolationKind::Overpaid => ("at most", "excess"),
                };
                output.push_str(&format!(
                    "  • {}: earning ${:.2}, should earn {} ${:.2} ({}: ${:.2})\n",
                    violation.manager,
                    violation.manager.salary(),
                    bound,
                    violation.expected_salary(),
                    label,
                    violation.amount
                ));
                if self.options.show_averages {
                    output.push_str(&format!(
                        "    Direct subordinates average: ${:.2}\n",
                        violation.subordinate_average
                    ));
                }
            }
        }
        output.push('\n');
    }

    fn format_json(&self, report: &AuditReport) -> OrgResult<String> {
        serde_json::to_string_pretty(report)
            .map_err(|e| OrgError::report(format!("JSON serialization failed: {e}")))
    }

    fn format_summary(&self, report: &AuditReport) -> String {
        let total = report.summary.total_violations();
        let execution_time = (report.summary.execution_time_ms as f64) / 1000.0;
        let text = format!(
            "Summary: {} violation{} across {} managers evaluated ({:.1}s)\n",
            total,
            if total == 1 { "" } else { "s" },
            report.summary.managers_evaluated,
            execution_time
        );
        if !self.options.use_colors {
            return text;
        }
        let color = if total == 0 { "32" } else { "33" };
        format!("\x1b[{color}m{text}\x1b[0m")
    }

    fn heading(&self, text: &str) -> String {
        if self.options.use_colors {
            format!("\x1b[1m{text}\x1b[0m\n")
        } else {
            format!("{text}\n")
        }
    }

    fn ok(&self, text: &str) -> String {
        if self.options.use_colors {
            format!("✓ \x1b[32m{text}\x1b[0m\n")
        } else {
            format!("✓ {text}\n")
        }
    }

    fn warn(&self, text: &str) -> String {
        if self.options.use_colors {
            format!("⚠ \x1b[33m{text}\x1b[0m\n")
        } else {
            format!("⚠ {text}\n")
        }
    }
}
