//! Open-issue reports: the daily digest and the per-user task report.
//!
//! Both reports share one pipeline: fetch every open issue from Linear,
//! group them, render embeds, deliver. Rendering is pure and lives in
//! [`digest`] and [`by_user`]; this module wires it to the client and sink.

pub mod by_user;
pub mod digest;
pub mod grouping;

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::client::LinearClient;
use crate::discord::{MessageSink, WebhookMessage};
use crate::error::{DeliveryError, RelayError};
use crate::models::Issue;

pub use grouping::{group_by_assignee, group_by_status, AssigneeGroup, PriorityCounts, StatusGroup};

/// Render the daily digest for a set of issues.
///
/// An empty set yields the "no open issues" message instead.
#[must_use]
pub fn build_digest(issues: &[Issue], now: DateTime<Utc>) -> WebhookMessage {
    if issues.is_empty() {
        return digest::no_issues_message(now);
    }

    let by_status = group_by_status(issues);
    let by_assignee = group_by_assignee(issues);
    digest::digest_message(issues, &by_status, &by_assignee, now)
}

/// Render the per-user report as a sequence of deliverable messages.
#[must_use]
pub fn build_user_report(issues: &[Issue], now: DateTime<Utc>) -> Vec<WebhookMessage> {
    if issues.is_empty() {
        return vec![digest::no_issues_message(now)];
    }

    let by_assignee = group_by_assignee(issues);
    by_user::user_report_messages(issues.len(), &by_assignee, now)
}

/// Deliver messages one after another, pausing `delay` between deliveries.
///
/// Stops at the first failure.
pub async fn deliver_batches(
    sink: &dyn MessageSink,
    messages: &[WebhookMessage],
    delay: Duration,
) -> Result<(), DeliveryError> {
    for (index, message) in messages.iter().enumerate() {
        if index > 0 {
            debug!(delay_ms = delay.as_millis(), "Pausing between batches");
            tokio::time::sleep(delay).await;
        }
        debug!(
            sink = sink.name(),
            batch = index + 1,
            total = messages.len(),
            "Delivering batch"
        );
        sink.deliver(message).await?;
    }
    Ok(())
}

/// Fetch open issues and send the daily digest.
pub async fn send_daily_digest(
    client: &LinearClient,
    sink: &dyn MessageSink,
) -> Result<(), RelayError> {
    info!("Fetching issues from Linear...");
    let issues = client.fetch_open_issues().await?;
    info!(count = issues.len(), "Fetched open issues");

    let message = build_digest(&issues, Utc::now());
    sink.deliver(&message).await?;
    Ok(())
}

/// Fetch open issues and send the per-user report in batches.
pub async fn send_user_report(
    client: &LinearClient,
    sink: &dyn MessageSink,
    delay: Duration,
) -> Result<(), RelayError> {
    info!("Fetching issues for per-user report...");
    let issues = client.fetch_open_issues().await?;

    let messages = build_user_report(&issues, Utc::now());
    info!(
        issues = issues.len(),
        batches = messages.len(),
        "Sending per-user report"
    );
    deliver_batches(sink, &messages, delay).await?;
    Ok(())
}
