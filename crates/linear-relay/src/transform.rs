//! Webhook event → Discord message rendering.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::discord::{Embed, EmbedAuthor, EmbedField, WebhookMessage};
use crate::format::{
    capitalize, priority_emoji, state_emoji, truncate, COLOR_BLUE, COLOR_GREEN, COLOR_PURPLE,
    COLOR_RED, COLOR_YELLOW,
};
use crate::models::{User, WebhookComment, WebhookIssue, WebhookProject};
use crate::webhooks::{WebhookAction, WebhookEvent};

/// Display name for relayed webhook messages.
const RELAY_USERNAME: &str = "Linear";

const DESCRIPTION_LIMIT: usize = 300;
const COMMENT_LIMIT: usize = 500;

const NO_DESCRIPTION: &str = "*No description*";
const NO_CONTENT: &str = "*No content*";

/// Render an event, or `None` for event types the relay does not forward.
#[must_use]
pub fn render_event(event: &WebhookEvent, now: DateTime<Utc>) -> Option<WebhookMessage> {
    let embed = match event {
        WebhookEvent::Issue {
            action,
            actor,
            issue,
        } => issue_embed(action, actor.as_ref(), issue, now),
        WebhookEvent::Comment {
            action,
            actor,
            comment,
        } => comment_embed(action, actor.as_ref(), comment, now),
        WebhookEvent::Project {
            action,
            actor,
            project,
        } => project_embed(action, actor.as_ref(), project, now),
        WebhookEvent::Unrecognized { .. } => return None,
    };

    Some(WebhookMessage::from_linear(RELAY_USERNAME, vec![embed]))
}

/// RFC 3339 timestamp in the form Discord expects.
#[must_use]
pub fn embed_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn issue_title(action: &WebhookAction) -> (&'static str, String) {
    match action {
        WebhookAction::Create => ("🎯", "New Issue Created".to_string()),
        WebhookAction::Update => ("📝", "Issue Updated".to_string()),
        WebhookAction::Remove => ("🗑️", "Issue Removed".to_string()),
        WebhookAction::Other(verb) => ("📋", format!("Issue {}", capitalize(verb))),
    }
}

fn comment_title(action: &WebhookAction) -> (&'static str, String) {
    match action {
        WebhookAction::Create => ("💬", "New Comment".to_string()),
        WebhookAction::Update => ("✏️", "Comment Updated".to_string()),
        WebhookAction::Remove => ("🗑️", "Comment Removed".to_string()),
        WebhookAction::Other(verb) => ("💬", format!("Comment {}", capitalize(verb))),
    }
}

fn project_title(action: &WebhookAction) -> (&'static str, String) {
    match action {
        WebhookAction::Create => ("🚀", "New Project Created".to_string()),
        WebhookAction::Update => ("📊", "Project Updated".to_string()),
        WebhookAction::Remove => ("🗑️", "Project Removed".to_string()),
        WebhookAction::Other(verb) => ("📁", format!("Project {}", capitalize(verb))),
    }
}

/// Color for Issue and Project events.
const fn action_color(action: &WebhookAction) -> u32 {
    match action {
        WebhookAction::Create => COLOR_GREEN,
        WebhookAction::Update => COLOR_YELLOW,
        WebhookAction::Remove => COLOR_RED,
        WebhookAction::Other(_) => COLOR_BLUE,
    }
}

fn body_or_placeholder(body: &str, limit: usize, placeholder: &str) -> String {
    let body = truncate(body, limit);
    if body.is_empty() {
        placeholder.to_string()
    } else {
        body
    }
}

fn with_actor(embed: Embed, actor: Option<&User>) -> Embed {
    match actor {
        Some(actor) => embed.footer(format!("by {}", actor.display())),
        None => embed,
    }
}

fn issue_embed(
    action: &WebhookAction,
    actor: Option<&User>,
    issue: &WebhookIssue,
    now: DateTime<Utc>,
) -> Embed {
    let (emoji, title) = issue_title(action);
    let description = body_or_placeholder(&issue.description, DESCRIPTION_LIMIT, NO_DESCRIPTION);

    let mut embed = Embed::new(format!("{emoji} {title}"), action_color(action))
        .description(format!(
            "**[{}]({})** - {}\n\n{description}",
            issue.identifier, issue.url, issue.title
        ))
        .url(&issue.url)
        .timestamp(embed_timestamp(now));

    if let Some(state) = &issue.state {
        embed = embed.field(EmbedField::inline(
            "Status",
            format!("{} {}", state_emoji(state.state_type), state.name),
        ));
    }

    if !issue.priority_label.is_empty() {
        embed = embed.field(EmbedField::inline(
            "Priority",
            format!("{} {}", priority_emoji(issue.priority), issue.priority_label),
        ));
    }

    if let Some(assignee) = &issue.assignee {
        embed = embed.field(EmbedField::inline("Assignee", format!("👤 {}", assignee.name)));
    }

    if let Some(team) = &issue.team {
        embed = embed.field(EmbedField::inline("Team", format!("👥 {}", team.name)));
    }

    if !issue.labels.is_empty() {
        let labels: Vec<String> = issue
            .labels
            .iter()
            .map(|label| format!("`{}`", label.name))
            .collect();
        embed = embed.field(EmbedField::block("Labels", labels.join(" ")));
    }

    with_actor(embed, actor)
}

fn comment_embed(
    action: &WebhookAction,
    actor: Option<&User>,
    comment: &WebhookComment,
    now: DateTime<Utc>,
) -> Embed {
    let (emoji, title) = comment_title(action);

    let issue_info = comment
        .issue
        .as_ref()
        .map(|issue| format!("**[{}]({})** - {}", issue.identifier, issue.url, issue.title))
        .unwrap_or_default();
    let body = body_or_placeholder(&comment.body, COMMENT_LIMIT, NO_CONTENT);

    let mut embed = Embed::new(format!("{emoji} {title}"), COLOR_PURPLE)
        .description(format!("{issue_info}\n\n>>> {body}"))
        .url(&comment.url)
        .timestamp(embed_timestamp(now));

    if let Some(user) = &comment.user {
        embed.author = Some(EmbedAuthor {
            name: user.name.clone(),
            url: None,
            icon_url: None,
        });
    }

    with_actor(embed, actor)
}

fn project_embed(
    action: &WebhookAction,
    actor: Option<&User>,
    project: &WebhookProject,
    now: DateTime<Utc>,
) -> Embed {
    let (emoji, title) = project_title(action);
    let description =
        body_or_placeholder(&project.description, DESCRIPTION_LIMIT, NO_DESCRIPTION);

    let mut embed = Embed::new(format!("{emoji} {title}"), action_color(action))
        .description(format!("**{}**\n\n{description}", project.name))
        .url(&project.url)
        .timestamp(embed_timestamp(now));

    if !project.state.is_empty() {
        embed = embed.field(EmbedField::inline("State", project.state.clone()));
    }

    with_actor(embed, actor)
}
