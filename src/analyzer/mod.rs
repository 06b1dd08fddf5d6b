//! Policy analysis over a built hierarchy
//!
//! CDD Principle: Domain Services - the analyzer runs read-only queries against a Hierarchy
//! - Salary analysis compares each manager with the average of their direct reports
//! - Reporting-line analysis walks manager references up to the root
//! - Neither analysis mutates the hierarchy, so both may run side by side

use crate::config::{AuditConfig, ReportingPolicy, SalaryPolicy};
use crate::domain::{
    AuditReport, Employee, OrgError, OrgResult, ReportingLineAnalysis, ReportingLineViolation,
    SalaryAnalysis, SalaryViolation,
};
use crate::hierarchy::Hierarchy;
use std::collections::HashSet;
use std::time::Instant;

/// Options for customizing analysis behavior
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Run the salary and reporting-line analyses on separate threads
    pub parallel: bool,
}

/// Runs both policy analyses with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct HierarchyAnalyzer {
    config: AuditConfig,
}

impl HierarchyAnalyzer {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn config_fingerprint(&self) -> String {
        self.config.fingerprint()
    }

    pub fn analyze_salaries(&self, hierarchy: &Hierarchy) -> SalaryAnalysis {
        analyze_salaries(hierarchy, &self.config.salary)
    }

    pub fn analyze_reporting_lines(&self, hierarchy: &Hierarchy) -> OrgResult<ReportingLineAnalysis> {
        analyze_reporting_lines(hierarchy, &self.config.reporting)
    }

    /// Run both analyses and aggregate them into a report
    pub fn analyze(&self, hierarchy: &Hierarchy, options: &AnalysisOptions) -> OrgResult<AuditReport> {
        let start_time = Instant::now();

        let (salaries, reporting_lines) = if options.parallel {
            rayon::join(
                || self.analyze_salaries(hierarchy),
                || self.analyze_reporting_lines(hierarchy),
            )
        } else {
            (
                self.analyze_salaries(hierarchy),
                self.analyze_reporting_lines(hierarchy),
            )
        };

        let mut report = AuditReport::new(
            hierarchy.root().clone(),
            hierarchy.len(),
            salaries,
            reporting_lines?,
        );
        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        report.set_config_fingerprint(self.config_fingerprint());

        tracing::info!(
            employees = report.summary.total_employees,
            underpaid = report.summary.underpaid_count,
            overpaid = report.summary.overpaid_count,
            reporting_lines = report.summary.reporting_line_count,
            "analysis complete"
        );

        Ok(report)
    }
}

/// Compare every manager's salary against the band around their direct reports' average
///
/// Only direct reports count toward the average. A salary exactly on a bound
/// is compliant. Both result lists follow roster order.
pub fn analyze_salaries(hierarchy: &Hierarchy, policy: &SalaryPolicy) -> SalaryAnalysis {
    let mut analysis = SalaryAnalysis::default();

    for manager in hierarchy.managers() {
        let reports = hierarchy.direct_reports(manager.id());
        let count = reports.len();
        if count == 0 {
            continue;
        }
        let average = reports.map(Employee::salary).sum::<f64>() / count as f64;
        analysis.managers_evaluated += 1;

        let minimum = average * policy.min_multiplier();
        let maximum = average * policy.max_multiplier();
        let salary = manager.salary();

        if salary < minimum {
            tracing::debug!(manager = manager.id(), salary, minimum, "manager underpaid");
            analysis
                .underpaid
                .push(SalaryViolation::underpaid(manager.clone(), minimum - salary, average));
        } else if salary > maximum {
            tracing::debug!(manager = manager.id(), salary, maximum, "manager overpaid");
            analysis
                .overpaid
                .push(SalaryViolation::overpaid(manager.clone(), salary - maximum, average));
        }
    }

    analysis
}

/// Find employees with more managers above them than the policy allows
pub fn analyze_reporting_lines(
    hierarchy: &Hierarchy,
    policy: &ReportingPolicy,
) -> OrgResult<ReportingLineAnalysis> {
    let mut analysis = ReportingLineAnalysis {
        violations: Vec::new(),
        max_managers: policy.max_managers,
    };

    for employee in hierarchy.employees().iter().filter(|e| !e.is_root()) {
        let total_managers = count_managers_to_root(hierarchy, employee)?;
        if total_managers > policy.max_managers {
            tracing::debug!(
                employee = employee.id(),
                total_managers,
                "reporting line too long"
            );
            analysis.violations.push(ReportingLineViolation {
                employee: employee.clone(),
                total_managers,
                excess_managers: total_managers - policy.max_managers,
            });
        }
    }

    Ok(analysis)
}

/// Number of managers between `employee` and the root, the root included
pub fn count_managers_to_root(hierarchy: &Hierarchy, employee: &Employee) -> OrgResult<usize> {
    chain_of_command(hierarchy, employee).map(|chain| chain.len())
}

/// Managers above `employee`, nearest first, ending with the root
///
/// Fails instead of looping if a manager reference leads back to someone
/// already visited.
pub fn chain_of_command<'h>(
    hierarchy: &'h Hierarchy,
    employee: &Employee,
) -> OrgResult<Vec<&'h Employee>> {
    let mut visited = HashSet::new();
    let mut chain = Vec::new();
    let mut current = match hierarchy.get(employee.id()) {
        Some(current) => current,
        None => return Ok(chain),
    };

    while !current.is_root() {
        if !visited.insert(current.id()) {
            return Err(OrgError::CyclicReportingLine {
                employee_id: employee.id().to_string(),
            });
        }
        match hierarchy.manager_of(current) {
            Some(manager) => {
                chain.push(manager);
                current = manager;
            }
            None => break,
        }
    }

    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::hierarchy::build_hierarchy;
    use rstest::rstest;

    fn emp(id: &str, salary: f64, manager: Option<&str>) -> Employee {
        Employee::new(id, format!("Employee {id}"), salary, manager).unwrap()
    }

    /// root -> A -> B -> C -> D -> E
    fn deep_chain() -> Hierarchy {
        build_hierarchy(vec![
            emp("root", 500_000.0, None),
            emp("A", 300_000.0, Some("root")),
            emp("B", 200_000.0, Some("A")),
            emp("C", 150_000.0, Some("B")),
            emp("D", 100_000.0, Some("C")),
            emp("E", 80_000.0, Some("D")),
        ])
        .unwrap()
    }

    #[test]
    fn test_salary_lower_boundary_is_compliant() {
        let hierarchy = build_hierarchy(vec![
            emp("root", 200_000.0, None),
            emp("A", 120_000.0, Some("root")),
            emp("B", 100_000.0, Some("A")),
        ])
        .unwrap();

        let analysis = analyze_salaries(&hierarchy, &SalaryPolicy::default());

        // A sits exactly on 1.2x of B, root is above 1.5x of A
        assert!(analysis.underpaid.is_empty());
        assert_eq!(analysis.overpaid.len(), 1);
        assert_eq!(analysis.overpaid[0].manager.id(), "root");
        assert_eq!(analysis.managers_evaluated, 2);
    }

    #[test]
    fn test_overpaid_manager_excess() {
        let hierarchy = build_hierarchy(vec![
            emp("M", 160_000.0, None),
            emp("R1", 90_000.0, Some("M")),
            emp("R2", 95_000.0, Some("M")),
        ])
        .unwrap();

        let analysis = analyze_salaries(&hierarchy, &SalaryPolicy::default());

        assert!(analysis.underpaid.is_empty());
        assert_eq!(analysis.overpaid.len(), 1);
        let violation = &analysis.overpaid[0];
        assert_eq!(violation.manager.id(), "M");
        assert!((violation.subordinate_average - 92_500.0).abs() < 1e-9);
        assert!((violation.amount - 21_250.0).abs() < 1e-9);
        assert!((violation.expected_salary() - 138_750.0).abs() < 1e-9);
    }

    #[test]
    fn test_underpaid_manager_shortage() {
        let hierarchy = build_hierarchy(vec![
            emp("M", 70_000.0, None),
            emp("R", 60_000.0, Some("M")),
        ])
        .unwrap();

        let analysis = analyze_salaries(&hierarchy, &SalaryPolicy::default());

        assert_eq!(analysis.underpaid.len(), 1);
        assert!((analysis.underpaid[0].amount - 2_000.0).abs() < 1e-9);
        assert!(analysis.overpaid.is_empty());
    }

    #[rstest]
    #[case(72_000.0, true)]
    #[case(75_000.0, true)]
    #[case(90_000.0, true)]
    #[case(71_999.0, false)]
    #[case(90_001.0, false)]
    fn test_salary_band_edges(#[case] manager_salary: f64, #[case] compliant: bool) {
        let hierarchy = build_hierarchy(vec![
            emp("M", manager_salary, None),
            emp("R", 60_000.0, Some("M")),
        ])
        .unwrap();

        let analysis = analyze_salaries(&hierarchy, &SalaryPolicy::default());
        assert_eq!(analysis.is_compliant(), compliant);
    }

    #[test]
    fn test_average_uses_direct_reports_only() {
        // M's grand-report earns a lot but must not affect M's band
        let hierarchy = build_hierarchy(vec![
            emp("M", 130_000.0, None),
            emp("R", 100_000.0, Some("M")),
            emp("G", 1_000.0, Some("R")),
        ])
        .unwrap();

        let analysis = analyze_salaries(&hierarchy, &SalaryPolicy::default());

        let flagged: Vec<_> = analysis.overpaid.iter().map(|v| v.manager.id()).collect();
        assert_eq!(flagged, vec!["R"]);
        assert!(analysis.underpaid.is_empty());
    }

    #[test]
    fn test_salary_results_follow_roster_order() {
        let hierarchy = build_hierarchy(vec![
            emp("X", 10_000.0, Some("root")),
            emp("root", 1_000_000.0, None),
            emp("Y", 10_000.0, Some("root")),
            emp("x1", 50_000.0, Some("X")),
            emp("y1", 50_000.0, Some("Y")),
        ])
        .unwrap();

        let analysis = analyze_salaries(&hierarchy, &SalaryPolicy::default());
        let underpaid: Vec<_> = analysis.underpaid.iter().map(|v| v.manager.id()).collect();
        assert_eq!(underpaid, vec!["X", "Y"]);
    }

    #[test]
    fn test_reporting_line_depth_violation() {
        let hierarchy = deep_chain();

        let analysis = analyze_reporting_lines(&hierarchy, &ReportingPolicy::default()).unwrap();

        assert_eq!(analysis.violations.len(), 1);
        let violation = &analysis.violations[0];
        assert_eq!(violation.employee.id(), "E");
        assert_eq!(violation.total_managers, 5);
        assert_eq!(violation.excess_managers, 1);

        let d = hierarchy.get("D").unwrap();
        assert_eq!(count_managers_to_root(&hierarchy, d).unwrap(), 4);
    }

    #[test]
    fn test_chain_of_command_order() {
        let hierarchy = deep_chain();
        let e = hierarchy.get("E").unwrap();

        let chain: Vec<_> = chain_of_command(&hierarchy, e)
            .unwrap()
            .into_iter()
            .map(Employee::id)
            .collect();

        assert_eq!(chain, vec!["D", "C", "B", "A", "root"]);
        assert!(chain_of_command(&hierarchy, hierarchy.root()).unwrap().is_empty());
    }

    #[test]
    fn test_stricter_reporting_policy() {
        let hierarchy = deep_chain();
        let policy = ReportingPolicy { max_managers: 3 };

        let analysis = analyze_reporting_lines(&hierarchy, &policy).unwrap();
        let flagged: Vec<_> = analysis
            .violations
            .iter()
            .map(|v| (v.employee.id(), v.excess_managers))
            .collect();

        assert_eq!(flagged, vec![("D", 1), ("E", 2)]);
    }

    #[test]
    fn test_corrupted_hierarchy_fails_with_cycle() {
        let mut hierarchy = deep_chain();
        hierarchy.reassign_manager_unchecked("A", "C");

        let err = analyze_reporting_lines(&hierarchy, &ReportingPolicy::default()).unwrap_err();
        assert!(matches!(err, OrgError::CyclicReportingLine { ref employee_id } if employee_id == "A"));
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_analyze_builds_report(#[case] parallel: bool) {
        let analyzer = HierarchyAnalyzer::new(ConfigBuilder::new().max_managers(4).build().unwrap());
        let hierarchy = deep_chain();

        let report = analyzer
            .analyze(&hierarchy, &AnalysisOptions { parallel })
            .unwrap();

        assert_eq!(report.root.id(), "root");
        assert_eq!(report.summary.total_employees, 6);
        assert_eq!(report.summary.reporting_line_count, 1);
        assert_eq!(report.summary.managers_evaluated, 5);
        assert_eq!(report.config_fingerprint, Some(analyzer.config_fingerprint()));
    }

    #[test]
    fn test_analyze_propagates_cycle_error() {
        let mut hierarchy = deep_chain();
        hierarchy.reassign_manager_unchecked("B", "D");

        let result = HierarchyAnalyzer::default().analyze(&hierarchy, &AnalysisOptions::default());
        assert!(matches!(result, Err(OrgError::CyclicReportingLine { .. })));
    }
}
