//! Discord webhook payloads and delivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::DeliveryError;

/// Discord accepts at most this many embeds per message.
pub const MAX_EMBEDS_PER_MESSAGE: usize = 10;

/// Anything that can take a rendered message and deliver it.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Get the name of this sink.
    fn name(&self) -> &'static str;

    /// Deliver one message.
    async fn deliver(&self, message: &WebhookMessage) -> Result<(), DeliveryError>;
}

/// Discord webhook sender.
pub struct DiscordWebhook {
    webhook_url: String,
    client: reqwest::Client,
}

impl DiscordWebhook {
    /// Create a sender for a specific webhook URL.
    #[must_use]
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MessageSink for DiscordWebhook {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn deliver(&self, message: &WebhookMessage) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(message)?;

        info!(embeds = message.embeds.len(), "Sending to Discord");

        let response = self
            .client
            .post(&self.webhook_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(status = %status, "Successfully sent to Discord");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();

            warn!(
                channel = "discord",
                status = %status,
                body = %body,
                "Discord webhook request failed"
            );

            Err(DeliveryError::Status { status, body })
        }
    }
}

// =============================================================================
// Discord API types
// =============================================================================

/// Top-level webhook execute payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl WebhookMessage {
    /// Message posted under the given display name with the Linear avatar.
    #[must_use]
    pub fn from_linear(username: &str, embeds: Vec<Embed>) -> Self {
        Self {
            content: None,
            username: Some(username.to_string()),
            avatar_url: Some(crate::format::LINEAR_AVATAR_URL.to_string()),
            embeds,
        }
    }
}

/// Rich content block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Start an embed with a title and color.
    #[must_use]
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: Some(title.into()),
            color: Some(color),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the link; empty URLs are dropped since Discord rejects them.
    #[must_use]
    pub fn url(mut self, url: &str) -> Self {
        self.url = (!url.is_empty()).then(|| url.to_string());
        self
    }

    #[must_use]
    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    #[must_use]
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter {
            text: text.into(),
            icon_url: None,
        });
        self
    }

    #[must_use]
    pub fn field(mut self, field: EmbedField) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inline: bool,
}

impl EmbedField {
    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }

    pub fn block(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}

/// Split embeds into messages that respect [`MAX_EMBEDS_PER_MESSAGE`].
#[must_use]
pub fn batch_embeds(username: &str, embeds: Vec<Embed>) -> Vec<WebhookMessage> {
    let mut batches = Vec::new();
    let mut current = Vec::with_capacity(MAX_EMBEDS_PER_MESSAGE);

    for embed in embeds {
        current.push(embed);
        if current.len() == MAX_EMBEDS_PER_MESSAGE {
            batches.push(WebhookMessage::from_linear(username, std::mem::take(&mut current)));
        }
    }
    if !current.is_empty() {
        batches.push(WebhookMessage::from_linear(username, current));
    }

    debug!(batches = batches.len(), "Split embeds into messages");
    batches
}
