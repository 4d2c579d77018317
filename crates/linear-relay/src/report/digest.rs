//! Daily digest rendering.

use chrono::{DateTime, Utc};

use super::grouping::{AssigneeGroup, PriorityCounts, StatusGroup};
use crate::discord::{Embed, EmbedField, WebhookMessage};
use crate::format::{
    assignee_emoji, priority_emoji, state_emoji, truncate, COLOR_BLUE, COLOR_GREEN, COLOR_RED,
    COLOR_YELLOW, UNASSIGNED,
};
use crate::models::Issue;
use crate::transform::embed_timestamp;

/// Display name for digest messages.
pub const DIGEST_USERNAME: &str = "Linear Daily Digest";

const DIGEST_TITLE: &str = "📊 Linear Daily Digest";
const MAX_PRIORITY_ISSUES: usize = 10;
const MAX_RECENT_ISSUES: usize = 5;
const PRIORITY_TITLE_LIMIT: usize = 40;
const RECENT_TITLE_LIMIT: usize = 50;

/// The single message sent when nothing is open.
#[must_use]
pub fn no_issues_message(now: DateTime<Utc>) -> WebhookMessage {
    let embed = Embed::new(DIGEST_TITLE, COLOR_GREEN)
        .description("No open issues found. Great job keeping the backlog clean! 🎉")
        .timestamp(embed_timestamp(now))
        .footer(DIGEST_USERNAME);

    WebhookMessage::from_linear(DIGEST_USERNAME, vec![embed])
}

/// Render the digest: summary, then priority and recent sections when non-empty.
#[must_use]
pub fn digest_message(
    issues: &[Issue],
    by_status: &[StatusGroup<'_>],
    by_assignee: &[AssigneeGroup<'_>],
    now: DateTime<Utc>,
) -> WebhookMessage {
    let counts = PriorityCounts::from_issues(issues);

    let mut embeds = vec![summary_embed(issues.len(), counts, by_status, by_assignee, now)];

    if counts.any() {
        if let Some(embed) = priority_embed(issues) {
            embeds.push(embed);
        }
    }

    if let Some(embed) = recent_embed(issues, now) {
        embeds.push(embed);
    }

    WebhookMessage::from_linear(DIGEST_USERNAME, embeds)
}

fn summary_embed(
    total: usize,
    counts: PriorityCounts,
    by_status: &[StatusGroup<'_>],
    by_assignee: &[AssigneeGroup<'_>],
    now: DateTime<Utc>,
) -> Embed {
    let status_lines: Vec<String> = by_status
        .iter()
        .map(|group| {
            format!(
                "{} **{}**: {}",
                state_emoji(group.state_type),
                group.name,
                group.count()
            )
        })
        .collect();

    let assignee_lines: Vec<String> = by_assignee
        .iter()
        .map(|group| {
            format!(
                "{} **{}**: {}",
                assignee_emoji(&group.name),
                group.name,
                group.count()
            )
        })
        .collect();

    let mut alerts = Vec::new();
    if counts.urgent > 0 {
        alerts.push(format!("🔴 **{} Urgent**", counts.urgent));
    }
    if counts.high > 0 {
        alerts.push(format!("🟠 **{} High Priority**", counts.high));
    }

    let mut summary = vec![format!("**{total}** open issues across your workspace")];
    if !alerts.is_empty() {
        summary.push(alerts.join(" | "));
    }

    Embed::new(DIGEST_TITLE, COLOR_BLUE)
        .description(summary.join("\n"))
        .timestamp(embed_timestamp(now))
        .footer(format!("Total: {total} open issues • Generated at"))
        .field(EmbedField::inline("📋 By Status", status_lines.join("\n")))
        .field(EmbedField::inline("👥 By Assignee", assignee_lines.join("\n")))
}

fn priority_embed(issues: &[Issue]) -> Option<Embed> {
    let lines: Vec<String> = issues
        .iter()
        .filter(|issue| matches!(issue.priority, 1 | 2))
        .take(MAX_PRIORITY_ISSUES)
        .map(|issue| {
            let emoji = priority_emoji(issue.priority);
            let assignee = issue.assignee.as_ref().map_or(UNASSIGNED, |a| a.name.as_str());
            format!(
                "{emoji} [**{}**]({}) - {} ({assignee})",
                issue.identifier,
                issue.url,
                truncate(&issue.title, PRIORITY_TITLE_LIMIT)
            )
        })
        .collect();

    (!lines.is_empty())
        .then(|| Embed::new("🚨 Priority Issues", COLOR_RED).description(lines.join("\n")))
}

fn recent_embed(issues: &[Issue], now: DateTime<Utc>) -> Option<Embed> {
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map_or(now, |naive| naive.and_utc());

    let lines: Vec<String> = issues
        .iter()
        .filter(|issue| issue.updated_at > midnight)
        .take(MAX_RECENT_ISSUES)
        .map(|issue| {
            format!(
                "• [**{}**]({}) - {}",
                issue.identifier,
                issue.url,
                truncate(&issue.title, RECENT_TITLE_LIMIT)
            )
        })
        .collect();

    (!lines.is_empty())
        .then(|| Embed::new("🔄 Recently Updated", COLOR_YELLOW).description(lines.join("\n")))
}
