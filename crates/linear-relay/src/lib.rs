//! Linear → Discord communication relay.
//!
//! This crate provides:
//! - Webhook relay: Linear Issue/Comment/Project events rendered as Discord embeds
//! - Daily digest: open issues grouped by status and assignee
//! - Per-user report: one embed per assignee, delivered in batches
//! - GraphQL client for the Linear API with cursor pagination
//! - HTTP server exposing the relay and report endpoints
//!
//! # Configuration
//!
//! The service is configured via environment variables:
//!
//! - `DISCORD_WEBHOOK_URL`: Discord webhook URL (required)
//! - `LINEAR_API_KEY`: Linear API key (required for the report endpoints only)
//! - `PORT`: HTTP port (default 8080)

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod client;
pub mod config;
pub mod discord;
pub mod error;
pub mod format;
pub mod models;
pub mod report;
pub mod server;
pub mod transform;
pub mod webhooks;

pub use client::LinearClient;
pub use config::Config;
pub use discord::{DiscordWebhook, MessageSink, WebhookMessage};
pub use error::{ConfigError, DeliveryError, LinearError, RelayError};
pub use webhooks::{WebhookAction, WebhookEvent, WebhookPayload};
