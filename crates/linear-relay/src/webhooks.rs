//! Webhook envelope parsing.
//!
//! Linear posts every event in the same envelope; the `type` field decides
//! how `data` is read. [`WebhookEvent`] is the closed set of event kinds the
//! relay renders, with an explicit [`WebhookEvent::Unrecognized`] variant for
//! everything else.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RelayError;
use crate::models::{User, WebhookComment, WebhookIssue, WebhookProject};

/// Webhook action type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookAction {
    Create,
    Update,
    Remove,
    /// Any other verb Linear sends (kept verbatim for the title)
    Other(String),
}

impl WebhookAction {
    #[must_use]
    pub fn parse(action: &str) -> Self {
        match action {
            "create" => Self::Create,
            "update" => Self::Update,
            "remove" => Self::Remove,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Raw webhook envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    /// Action verb (create, update, remove, ...)
    pub action: String,
    /// Entity type (Issue, Comment, Project, ...)
    #[serde(rename = "type")]
    pub event_type: String,
    /// Actor who triggered the event
    #[serde(default)]
    pub actor: Option<User>,
    /// Created at timestamp
    #[serde(default)]
    pub created_at: Option<String>,
    /// Entity payload, shape depends on `event_type`
    #[serde(default)]
    pub data: Value,
    /// URL of the subject entity
    #[serde(default)]
    pub url: Option<String>,
    /// Unique webhook ID
    #[serde(default)]
    pub webhook_id: Option<String>,
    /// Timestamp when webhook was sent (milliseconds)
    #[serde(default)]
    pub webhook_timestamp: Option<i64>,
}

/// A webhook event the relay knows how to render.
#[derive(Debug, Clone)]
pub enum WebhookEvent {
    Issue {
        action: WebhookAction,
        actor: Option<User>,
        issue: WebhookIssue,
    },
    Comment {
        action: WebhookAction,
        actor: Option<User>,
        comment: WebhookComment,
    },
    Project {
        action: WebhookAction,
        actor: Option<User>,
        project: WebhookProject,
    },
    /// Event type outside the relayed set; acknowledged and dropped.
    Unrecognized { event_type: String },
}

impl WebhookPayload {
    /// Parse a raw request body into an envelope.
    pub fn from_slice(body: &[u8]) -> Result<Self, RelayError> {
        serde_json::from_slice(body).map_err(RelayError::InvalidPayload)
    }

    /// Resolve the envelope into a typed event, parsing `data` for its type.
    pub fn into_event(self) -> Result<WebhookEvent, RelayError> {
        let action = WebhookAction::parse(&self.action);
        let actor = self.actor;

        let event = match self.event_type.as_str() {
            "Issue" => WebhookEvent::Issue {
                action,
                actor,
                issue: parse_data("issue", self.data)?,
            },
            "Comment" => WebhookEvent::Comment {
                action,
                actor,
                comment: parse_data("comment", self.data)?,
            },
            "Project" => WebhookEvent::Project {
                action,
                actor,
                project: parse_data("project", self.data)?,
            },
            _ => WebhookEvent::Unrecognized {
                event_type: self.event_type,
            },
        };

        Ok(event)
    }
}

fn parse_data<T: serde::de::DeserializeOwned>(
    entity: &'static str,
    data: Value,
) -> Result<T, RelayError> {
    serde_json::from_value(data).map_err(|source| RelayError::MalformedData { entity, source })
}
