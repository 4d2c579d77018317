//! Partitioning of open issues by status and by assignee.

use std::collections::HashMap;

use crate::format::UNASSIGNED;
use crate::models::{Issue, StateType};

/// Issues sharing a workflow state name.
#[derive(Debug, Clone)]
pub struct StatusGroup<'a> {
    pub name: String,
    pub state_type: StateType,
    pub issues: Vec<&'a Issue>,
}

impl StatusGroup<'_> {
    #[must_use]
    pub fn count(&self) -> usize {
        self.issues.len()
    }
}

/// Issues sharing an assignee (or lacking one).
#[derive(Debug, Clone)]
pub struct AssigneeGroup<'a> {
    pub name: String,
    pub issues: Vec<&'a Issue>,
}

impl AssigneeGroup<'_> {
    #[must_use]
    pub fn count(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.name == UNASSIGNED
    }
}

/// Urgent and high priority tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityCounts {
    pub urgent: usize,
    pub high: usize,
}

impl PriorityCounts {
    #[must_use]
    pub fn from_issues(issues: &[Issue]) -> Self {
        issues.iter().fold(Self::default(), |mut counts, issue| {
            match issue.priority {
                1 => counts.urgent += 1,
                2 => counts.high += 1,
                _ => {}
            }
            counts
        })
    }

    #[must_use]
    pub const fn any(self) -> bool {
        self.urgent > 0 || self.high > 0
    }
}

/// Group by state name, ordered started → unstarted → backlog → other.
///
/// Groups of equal rank keep the order in which their first issue appeared.
#[must_use]
pub fn group_by_status(issues: &[Issue]) -> Vec<StatusGroup<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<StatusGroup<'_>> = Vec::new();

    for issue in issues {
        let slot = *index.entry(issue.state.name.as_str()).or_insert_with(|| {
            groups.push(StatusGroup {
                name: issue.state.name.clone(),
                state_type: issue.state.state_type,
                issues: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].issues.push(issue);
    }

    groups.sort_by_key(|group| group.state_type.sort_rank());
    groups
}

/// Group by assignee display name, largest first, `Unassigned` always last.
#[must_use]
pub fn group_by_assignee(issues: &[Issue]) -> Vec<AssigneeGroup<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<AssigneeGroup<'_>> = Vec::new();

    for issue in issues {
        let name = issue.assignee.as_ref().map_or(UNASSIGNED, |a| a.display());
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push(AssigneeGroup {
                name: name.to_string(),
                issues: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].issues.push(issue);
    }

    groups.sort_by(|a, b| {
        a.is_unassigned()
            .cmp(&b.is_unassigned())
            .then_with(|| b.count().cmp(&a.count()))
    });
    groups
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Connection, User, WorkflowState};
    use chrono::{TimeZone, Utc};

    pub(crate) fn issue(identifier: &str, priority: i32, state: (&str, StateType)) -> Issue {
        let at = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();
        Issue {
            id: format!("id-{identifier}"),
            identifier: identifier.to_string(),
            title: format!("Issue {identifier}"),
            description: None,
            priority,
            priority_label: String::new(),
            url: format!("https://linear.app/acme/issue/{identifier}"),
            created_at: at,
            updated_at: at,
            state: WorkflowState {
                id: format!("state-{}", state.0),
                name: state.0.to_string(),
                color: "#000000".to_string(),
                state_type: state.1,
            },
            assignee: None,
            team: None,
            labels: Connection::default(),
        }
    }

    pub(crate) fn assigned(mut issue: Issue, name: &str) -> Issue {
        issue.assignee = Some(User {
            id: format!("user-{name}"),
            name: name.to_string(),
            display_name: None,
            email: None,
        });
        issue
    }

    const TODO: (&str, StateType) = ("Todo", StateType::Unstarted);

    #[test]
    fn test_priority_counts() {
        let issues = vec![
            issue("A-1", 1, TODO),
            issue("A-2", 2, TODO),
            issue("A-3", 2, TODO),
            issue("A-4", 4, TODO),
        ];
        let counts = PriorityCounts::from_issues(&issues);
        assert_eq!(counts, PriorityCounts { urgent: 1, high: 2 });
        assert!(counts.any());
        assert!(!PriorityCounts::from_issues(&[issue("A-5", 0, TODO)]).any());
    }

    #[test]
    fn test_status_order() {
        let issues = vec![
            issue("A-1", 3, ("Triage", StateType::Other)),
            issue("A-2", 3, ("Backlog", StateType::Backlog)),
            issue("A-3", 3, TODO),
            issue("A-4", 3, ("In Progress", StateType::Started)),
            issue("A-5", 3, ("Backlog", StateType::Backlog)),
            issue("A-6", 3, ("In Review", StateType::Started)),
        ];

        let groups = group_by_status(&issues);
        let summary: Vec<(&str, usize)> = groups.iter().map(|g| (g.name.as_str(), g.count())).collect();
        assert_eq!(
            summary,
            vec![
                ("In Progress", 1),
                ("In Review", 1),
                ("Todo", 1),
                ("Backlog", 2),
                ("Triage", 1),
            ]
        );
    }

    #[test]
    fn test_assignee_order_unassigned_last() {
        let mut issues = Vec::new();
        for i in 0..5 {
            issues.push(issue(&format!("U-{i}"), 3, TODO));
        }
        issues.push(assigned(issue("B-1", 3, TODO), "Bob"));
        for i in 0..3 {
            issues.push(assigned(issue(&format!("A-{i}"), 3, TODO), "Alice"));
        }

        let groups = group_by_assignee(&issues);
        let summary: Vec<(&str, usize)> = groups.iter().map(|g| (g.name.as_str(), g.count())).collect();
        assert_eq!(summary, vec![("Alice", 3), ("Bob", 1), ("Unassigned", 5)]);
    }

    #[test]
    fn test_assignee_uses_display_name() {
        let mut with_display = assigned(issue("A-1", 3, TODO), "Alice Smith");
        if let Some(user) = with_display.assignee.as_mut() {
            user.display_name = Some("alice".to_string());
        }
        let issues = vec![with_display, assigned(issue("A-2", 3, TODO), "Alice Smith")];

        let groups = group_by_assignee(&issues);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "Alice Smith"]);
    }
}
