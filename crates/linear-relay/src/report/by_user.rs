//! Per-assignee task report rendering.

use chrono::{DateTime, Utc};

use super::grouping::AssigneeGroup;
use crate::discord::{batch_embeds, Embed, WebhookMessage};
use crate::format::{assignee_emoji, priority_emoji, truncate, COLOR_BLUE, COLOR_GRAY};
use crate::transform::embed_timestamp;

/// Display name for per-user report messages.
pub const TASK_REPORT_USERNAME: &str = "Linear Task Report";

/// Issues listed individually per assignee before summarising the rest.
pub const MAX_TASKS_PER_USER: usize = 15;

const TITLE_LIMIT: usize = 50;

/// Render the header plus one embed per assignee, split into deliverable batches.
#[must_use]
pub fn user_report_messages(
    total: usize,
    by_assignee: &[AssigneeGroup<'_>],
    now: DateTime<Utc>,
) -> Vec<WebhookMessage> {
    let header = Embed::new("📋 Open Tasks by User", COLOR_BLUE)
        .description(format!(
            "**{total}** open tasks across **{}** assignees",
            by_assignee.len()
        ))
        .timestamp(embed_timestamp(now));

    let embeds = std::iter::once(header)
        .chain(by_assignee.iter().map(assignee_embed))
        .collect();

    batch_embeds(TASK_REPORT_USERNAME, embeds)
}

fn assignee_embed(group: &AssigneeGroup<'_>) -> Embed {
    let mut lines: Vec<String> = group
        .issues
        .iter()
        .take(MAX_TASKS_PER_USER)
        .map(|issue| {
            format!(
                "{} [{}]({}) - {}",
                priority_emoji(issue.priority),
                issue.identifier,
                issue.url,
                truncate(&issue.title, TITLE_LIMIT)
            )
        })
        .collect();

    if group.count() > MAX_TASKS_PER_USER {
        lines.push(format!(
            "*... and {} more*",
            group.count() - MAX_TASKS_PER_USER
        ));
    }

    Embed::new(
        format!(
            "{} {} ({} tasks)",
            assignee_emoji(&group.name),
            group.name,
            group.count()
        ),
        COLOR_GRAY,
    )
    .description(lines.join("\n"))
}
