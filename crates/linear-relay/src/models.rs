//! Linear entity type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Linear issue as returned by the open-issues query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Unique identifier
    pub id: String,
    /// Human-readable identifier (e.g., "ENG-42")
    pub identifier: String,
    /// Issue title
    pub title: String,
    /// Issue description (markdown)
    #[serde(default)]
    pub description: Option<String>,
    /// Priority (0 = no priority, 1 = urgent, 2 = high, 3 = normal, 4 = low)
    #[serde(default)]
    pub priority: i32,
    /// Priority display label (e.g., "Urgent")
    #[serde(default)]
    pub priority_label: String,
    /// URL to the issue
    #[serde(default)]
    pub url: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
    /// Current workflow state
    pub state: WorkflowState,
    /// Issue assignee
    #[serde(default)]
    pub assignee: Option<User>,
    /// Team the issue belongs to
    #[serde(default)]
    pub team: Option<Team>,
    /// Labels on the issue
    #[serde(default)]
    pub labels: Connection<Label>,
}

/// GraphQL connection wrapper (`{ nodes: [...] }`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection<T> {
    /// Items in this page
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

/// Cursor information for a paginated connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page follows
    pub has_next_page: bool,
    /// Cursor of the last item in this page
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// Workflow state category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateType {
    Backlog,
    Unstarted,
    Started,
    Completed,
    Canceled,
    /// Anything Linear adds later (e.g. "triage")
    #[serde(other)]
    Other,
}

impl StateType {
    /// Sort rank used by the status breakdown: active work first.
    #[must_use]
    pub const fn sort_rank(self) -> u8 {
        match self {
            Self::Started => 1,
            Self::Unstarted => 2,
            Self::Backlog => 3,
            Self::Completed | Self::Canceled | Self::Other => 4,
        }
    }
}

/// Linear workflow state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    /// Unique identifier
    #[serde(default)]
    pub id: String,
    /// State name (e.g., "In Progress")
    pub name: String,
    /// State color (hex)
    #[serde(default)]
    pub color: String,
    /// State type: backlog, unstarted, started, completed, canceled
    #[serde(rename = "type")]
    pub state_type: StateType,
}

/// Linear user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    #[serde(default)]
    pub id: String,
    /// Full name
    #[serde(default)]
    pub name: String,
    /// Short display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Display name when set, full name otherwise.
    #[must_use]
    pub fn display(&self) -> &str {
        match self.display_name.as_deref() {
            Some(display) if !display.is_empty() => display,
            _ => &self.name,
        }
    }
}

/// Linear team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub key: String,
}

/// Linear label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

// =========================================================================
// Webhook payload records
// =========================================================================

/// Issue as carried in the `data` field of an Issue webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookIssue {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub priority_label: String,
    #[serde(default)]
    pub state: Option<WorkflowState>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<Label>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

/// Comment as carried in the `data` field of a Comment webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookComment {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    #[serde(default)]
    pub issue: Option<WebhookIssue>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

/// Project as carried in the `data` field of a Project webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookProject {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

/// Linear sends explicit `null` for unset optional fields.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_type_unknown_is_other() {
        let state: WorkflowState =
            serde_json::from_str(r#"{"name": "Triage", "type": "triage"}"#).unwrap();
        assert_eq!(state.state_type, StateType::Other);
        assert_eq!(state.state_type.sort_rank(), 4);
    }

    #[test]
    fn test_user_display_falls_back_to_name() {
        let mut user = User {
            id: "u1".to_string(),
            name: "Jane Doe".to_string(),
            display_name: Some("jane".to_string()),
            email: None,
        };
        assert_eq!(user.display(), "jane");

        user.display_name = Some(String::new());
        assert_eq!(user.display(), "Jane Doe");

        user.display_name = None;
        assert_eq!(user.display(), "Jane Doe");
    }

    #[test]
    fn test_parse_report_issue() {
        let json = r##"{
            "id": "abc",
            "identifier": "ENG-1",
            "title": "Fix login",
            "priority": 2,
            "priorityLabel": "High",
            "url": "https://linear.app/acme/issue/ENG-1",
            "createdAt": "2026-10-01T08:00:00.000Z",
            "updatedAt": "2026-10-14T12:30:00.000Z",
            "state": {"id": "s1", "name": "In Progress", "color": "#f2c94c", "type": "started"},
            "assignee": null,
            "team": {"id": "t1", "name": "Engineering", "key": "ENG"},
            "labels": {"nodes": [{"id": "l1", "name": "bug", "color": "#eb5757"}]}
        }"##;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.identifier, "ENG-1");
        assert_eq!(issue.state.state_type, StateType::Started);
        assert!(issue.assignee.is_none());
        assert_eq!(issue.labels.nodes.len(), 1);
    }

    #[test]
    fn test_webhook_issue_tolerates_nulls() {
        let json = r#"{
            "id": "abc",
            "identifier": "ENG-2",
            "title": "Empty",
            "description": null,
            "priorityLabel": null,
            "labels": null
        }"#;

        let issue: WebhookIssue = serde_json::from_str(json).unwrap();
        assert!(issue.description.is_empty());
        assert!(issue.priority_label.is_empty());
        assert!(issue.labels.is_empty());
        assert!(issue.state.is_none());
    }
}
