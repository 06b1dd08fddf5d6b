//! Hierarchy construction from a flat roster
//!
//! CDD Principle: Aggregate Root - a Hierarchy is only ever handed out fully validated
//! - Exactly one root, unique ids, every manager reference resolves
//! - Every employee is reachable from the root, so the manager graph is a tree
//! - Built in a single pass and read-only afterwards

use crate::domain::{Employee, OrgError, OrgResult, RootCandidate};
use std::collections::{HashMap, VecDeque};

/// Validated management tree
///
/// Employees are stored in roster order; lookups resolve to positions in
/// that list.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    employees: Vec<Employee>,
    by_id: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
    root: usize,
}

impl Hierarchy {
    /// The single employee without a manager
    pub fn root(&self) -> &Employee {
        &self.employees[self.root]
    }

    /// Look up an employee by id
    pub fn get(&self, id: &str) -> Option<&Employee> {
        self.by_id.get(id).map(|&idx| &self.employees[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Direct reports of `id` in roster order
    ///
    /// Leaves and unknown ids yield nothing.
    pub fn direct_reports(&self, id: &str) -> impl ExactSizeIterator<Item = &Employee> + '_ {
        let reports: &[usize] = match self.by_id.get(id) {
            Some(&idx) => &self.children[idx],
            None => &[],
        };
        reports.iter().map(move |&idx| &self.employees[idx])
    }

    /// The employee's direct manager, `None` for the root
    pub fn manager_of(&self, employee: &Employee) -> Option<&Employee> {
        employee.manager_id().and_then(|manager_id| self.get(manager_id))
    }

    /// All employees in roster order
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Employees with at least one direct report, in roster order
    pub fn managers(&self) -> impl Iterator<Item = &Employee> + '_ {
        self.employees
            .iter()
            .zip(&self.children)
            .filter(|(_, reports)| !reports.is_empty())
            .map(|(employee, _)| employee)
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Always false: a built hierarchy holds at least its root
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Point `employee_id` at a new manager without any validation.
    ///
    /// Only for tests that need a corrupted hierarchy.
    #[cfg(test)]
    pub(crate) fn reassign_manager_unchecked(&mut self, employee_id: &str, manager_id: &str) {
        let Some(&idx) = self.by_id.get(employee_id) else {
            return;
        };

        for reports in &mut self.children {
            reports.retain(|&child| child != idx);
        }
        if let Some(&manager_idx) = self.by_id.get(manager_id) {
            self.children[manager_idx].push(idx);
        }
        self.employees[idx].set_manager_unchecked(Some(manager_id.to_string()));
    }
}

/// Builds a [`Hierarchy`] from an unordered roster
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyBuilder;

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Validate the roster and index it
    ///
    /// Checks run in this order and stop at the first failure: root count,
    /// duplicate ids, unresolved manager references (first offender in roster
    /// order), then reachability from the root.
    pub fn build<I>(&self, employees: I) -> OrgResult<Hierarchy>
    where
        I: IntoIterator<Item = Employee>,
    {
        let employees: Vec<Employee> = employees.into_iter().collect();

        let root = find_root(&employees)?;

        let mut by_id = HashMap::with_capacity(employees.len());
        for (idx, employee) in employees.iter().enumerate() {
            if by_id.insert(employee.id().to_string(), idx).is_some() {
                return Err(OrgError::DuplicateId {
                    id: employee.id().to_string(),
                });
            }
        }

        let mut children = vec![Vec::new(); employees.len()];
        for (idx, employee) in employees.iter().enumerate() {
            let Some(manager_id) = employee.manager_id() else {
                continue;
            };
            match by_id.get(manager_id) {
                Some(&manager_idx) => children[manager_idx].push(idx),
                None => {
                    return Err(OrgError::UnknownManager {
                        employee_id: employee.id().to_string(),
                        manager_id: manager_id.to_string(),
                    })
                }
            }
        }

        ensure_reachable(&employees, &children, root)?;

        tracing::debug!(
            employees = employees.len(),
            root = employees[root].id(),
            "built hierarchy"
        );

        Ok(Hierarchy {
            employees,
            by_id,
            children,
            root,
        })
    }
}

/// Build a hierarchy with the default builder
pub fn build_hierarchy<I>(employees: I) -> OrgResult<Hierarchy>
where
    I: IntoIterator<Item = Employee>,
{
    HierarchyBuilder::new().build(employees)
}

fn find_root(employees: &[Employee]) -> OrgResult<usize> {
    let roots: Vec<usize> = employees
        .iter()
        .enumerate()
        .filter(|(_, employee)| employee.is_root())
        .map(|(idx, _)| idx)
        .collect();

    match roots.as_slice() {
        [] => Err(OrgError::MissingRoot),
        [root] => Ok(*root),
        _ => Err(OrgError::MultipleRoots {
            candidates: roots
                .iter()
                .map(|&idx| RootCandidate {
                    id: employees[idx].id().to_string(),
                    name: employees[idx].name().to_string(),
                })
                .collect(),
        }),
    }
}

// With one root and every reference resolved, anything the root cannot reach
// sits on a manager cycle.
fn ensure_reachable(employees: &[Employee], children: &[Vec<usize>], root: usize) -> OrgResult<()> {
    let mut seen = vec![false; employees.len()];
    let mut queue = VecDeque::from([root]);
    seen[root] = true;

    while let Some(idx) = queue.pop_front() {
        for &child in &children[idx] {
            if !seen[child] {
                seen[child] = true;
                queue.push_back(child);
            }
        }
    }

    match seen.iter().position(|reached| !reached) {
        Some(idx) => Err(OrgError::CyclicReportingLine {
            employee_id: employees[idx].id().to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emp(id: &str, salary: f64, manager: Option<&str>) -> Employee {
        Employee::new(id, format!("Employee {id}"), salary, manager).unwrap()
    }

    fn ids<'a>(employees: impl Iterator<Item = &'a Employee>) -> Vec<&'a str> {
        employees.map(Employee::id).collect()
    }

    #[test]
    fn test_build_simple_hierarchy() {
        let hierarchy = build_hierarchy(vec![
            emp("2", 50_000.0, Some("1")),
            emp("1", 200_000.0, None),
            emp("3", 60_000.0, Some("1")),
            emp("4", 40_000.0, Some("2")),
        ])
        .unwrap();

        assert_eq!(hierarchy.root().id(), "1");
        assert_eq!(hierarchy.len(), 4);
        assert_eq!(ids(hierarchy.direct_reports("1")), vec!["2", "3"]);
        assert_eq!(ids(hierarchy.direct_reports("2")), vec!["4"]);
        assert_eq!(ids(hierarchy.managers()), vec!["2", "1"]);
        assert_eq!(ids(hierarchy.employees().iter()), vec!["2", "1", "3", "4"]);
    }

    #[test]
    fn test_direct_reports_empty_for_leaf_and_unknown() {
        let hierarchy =
            build_hierarchy(vec![emp("1", 100.0, None), emp("2", 50.0, Some("1"))]).unwrap();

        assert_eq!(hierarchy.direct_reports("2").len(), 0);
        assert_eq!(hierarchy.direct_reports("nobody").len(), 0);
        // Repeated calls stay empty
        assert_eq!(hierarchy.direct_reports("nobody").len(), 0);
    }

    #[test]
    fn test_single_root_only() {
        let hierarchy = build_hierarchy(vec![emp("ceo", 1.0, None)]).unwrap();
        assert_eq!(hierarchy.root().id(), "ceo");
        assert_eq!(hierarchy.managers().count(), 0);
        assert!(!hierarchy.is_empty());
    }

    #[test]
    fn test_manager_of() {
        let hierarchy =
            build_hierarchy(vec![emp("1", 100.0, None), emp("2", 50.0, Some("1"))]).unwrap();

        let report = hierarchy.get("2").unwrap();
        assert_eq!(hierarchy.manager_of(report).map(Employee::id), Some("1"));
        assert!(hierarchy.manager_of(hierarchy.root()).is_none());
    }

    #[test]
    fn test_empty_roster_has_no_root() {
        let err = build_hierarchy(Vec::new()).unwrap_err();
        assert!(matches!(err, OrgError::MissingRoot));
    }

    #[test]
    fn test_missing_root() {
        let err = build_hierarchy(vec![emp("1", 10.0, Some("2")), emp("2", 10.0, Some("1"))])
            .unwrap_err();
        assert!(matches!(err, OrgError::MissingRoot));
    }

    #[test]
    fn test_multiple_roots_lists_candidates() {
        let err = build_hierarchy(vec![
            emp("1", 10.0, None),
            emp("2", 10.0, Some("1")),
            emp("3", 10.0, None),
        ])
        .unwrap_err();

        match err {
            OrgError::MultipleRoots { candidates } => {
                let ids: Vec<_> = candidates.iter().map(|c| c.id.as_str()).collect();
                assert_eq!(ids, vec!["1", "3"]);
                assert_eq!(candidates[1].name, "Employee 3");
            }
            other => panic!("expected multiple roots, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_manager_reports_first_offender() {
        let err = build_hierarchy(vec![
            emp("1", 10.0, None),
            emp("2", 10.0, Some("404")),
            emp("3", 10.0, Some("500")),
        ])
        .unwrap_err();

        match err {
            OrgError::UnknownManager {
                employee_id,
                manager_id,
            } => {
                assert_eq!(employee_id, "2");
                assert_eq!(manager_id, "404");
            }
            other => panic!("expected unknown manager, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = build_hierarchy(vec![
            emp("1", 10.0, None),
            emp("2", 10.0, Some("1")),
            emp("2", 12.0, Some("1")),
        ])
        .unwrap_err();

        assert!(matches!(err, OrgError::DuplicateId { ref id } if id == "2"));
    }

    #[test]
    fn test_detached_cycle_rejected() {
        // 2 and 3 manage each other and never reach the root
        let err = build_hierarchy(vec![
            emp("1", 10.0, None),
            emp("2", 10.0, Some("3")),
            emp("3", 10.0, Some("2")),
            emp("4", 10.0, Some("1")),
        ])
        .unwrap_err();

        assert!(matches!(err, OrgError::CyclicReportingLine { ref employee_id } if employee_id == "2"));
    }

    #[test]
    fn test_self_managed_employee_rejected() {
        let err = build_hierarchy(vec![emp("1", 10.0, None), emp("2", 10.0, Some("2"))])
            .unwrap_err();
        assert!(matches!(err, OrgError::CyclicReportingLine { .. }));
    }

    #[test]
    fn test_reassign_manager_unchecked_moves_report() {
        let mut hierarchy = build_hierarchy(vec![
            emp("1", 10.0, None),
            emp("2", 10.0, Some("1")),
            emp("3", 10.0, Some("2")),
        ])
        .unwrap();

        hierarchy.reassign_manager_unchecked("2", "3");

        assert_eq!(hierarchy.direct_reports("1").len(), 0);
        assert_eq!(ids(hierarchy.direct_reports("3")), vec!["2"]);
        assert_eq!(hierarchy.get("2").unwrap().manager_id(), Some("3"));
    }
}
