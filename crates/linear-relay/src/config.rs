//! Configuration for the relay service.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Default Linear GraphQL endpoint.
pub const LINEAR_API_URL: &str = "https://api.linear.app/graphql";

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default pause between per-user report deliveries.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(500);

const ENV_DISCORD_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
const ENV_LINEAR_API_KEY: &str = "LINEAR_API_KEY";
const ENV_LINEAR_API_URL: &str = "LINEAR_API_URL";
const ENV_PORT: &str = "PORT";
const ENV_BATCH_DELAY_MS: &str = "REPORT_BATCH_DELAY_MS";

/// Relay configuration.
///
/// Built once at startup and handed to the server state; nothing reads the
/// environment after that.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,
    /// Discord webhook that receives every outbound message.
    pub discord_webhook_url: String,
    /// Linear API key, only needed for the report endpoints.
    pub linear_api_key: Option<String>,
    /// Linear GraphQL endpoint.
    pub linear_api_url: String,
    /// Pause between batches of the per-user report.
    pub batch_delay: Duration,
}

impl Config {
    /// Create a configuration with defaults for everything but the webhook URL.
    #[must_use]
    pub fn new(discord_webhook_url: impl Into<String>) -> Self {
        Self {
            port: DEFAULT_PORT,
            discord_webhook_url: discord_webhook_url.into(),
            linear_api_key: None,
            linear_api_url: LINEAR_API_URL.to_string(),
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }

    /// Set the Linear API key.
    #[must_use]
    pub fn with_linear_api_key(mut self, key: impl Into<String>) -> Self {
        self.linear_api_key = Some(key.into());
        self
    }

    /// Point the Linear client at a different endpoint.
    #[must_use]
    pub fn with_linear_api_url(mut self, url: impl Into<String>) -> Self {
        self.linear_api_url = url.into();
        self
    }

    /// Override the per-user report batch delay.
    #[must_use]
    pub const fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_webhook_url = non_empty(ENV_DISCORD_WEBHOOK_URL)
            .ok_or(ConfigError::Missing(ENV_DISCORD_WEBHOOK_URL))?;

        let port = match non_empty(ENV_PORT) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: ENV_PORT,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let batch_delay = match non_empty(ENV_BATCH_DELAY_MS) {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::Invalid {
                    key: ENV_BATCH_DELAY_MS,
                    value: raw,
                })?,
            None => DEFAULT_BATCH_DELAY,
        };

        Ok(Self {
            port,
            discord_webhook_url,
            linear_api_key: non_empty(ENV_LINEAR_API_KEY),
            linear_api_url: non_empty(ENV_LINEAR_API_URL)
                .unwrap_or_else(|| LINEAR_API_URL.to_string()),
            batch_delay,
        })
    }
}
