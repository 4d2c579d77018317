//! HTTP server for the relay.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::client::LinearClient;
use crate::config::Config;
use crate::discord::{DiscordWebhook, MessageSink};
use crate::error::{LinearError, RelayError};
use crate::report;
use crate::transform::render_event;
use crate::webhooks::{WebhookEvent, WebhookPayload};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration.
    pub config: Arc<Config>,
    /// Linear API client, absent when no API key is configured.
    pub linear_client: Option<LinearClient>,
    /// Outbound message sink.
    pub sink: Arc<dyn MessageSink>,
}

impl AppState {
    /// Build state from configuration, posting to the configured Discord webhook.
    pub fn new(config: Config) -> Result<Self, LinearError> {
        let sink = Arc::new(DiscordWebhook::new(config.discord_webhook_url.clone()));
        Self::with_sink(config, sink)
    }

    /// Build state with a specific sink.
    pub fn with_sink(config: Config, sink: Arc<dyn MessageSink>) -> Result<Self, LinearError> {
        let linear_client = match &config.linear_api_key {
            Some(key) => Some(LinearClient::new(key, config.linear_api_url.clone())?),
            None => {
                info!("No LINEAR_API_KEY configured - report endpoints are disabled");
                None
            }
        };

        Ok(Self {
            config: Arc::new(config),
            linear_client,
            sink,
        })
    }

    fn linear(&self) -> Result<&LinearClient, RelayError> {
        self.linear_client
            .as_ref()
            .ok_or(RelayError::NotConfigured("LINEAR_API_KEY"))
    }
}

/// Build the HTTP router for the relay.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/webhook", post(linear_webhook_handler))
        .route("/report", get(report_handler).post(report_handler))
        .route(
            "/report/by-user",
            get(user_report_handler).post(user_report_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process stops.
pub async fn run_server(state: AppState, addr: &str) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Linear-Discord relay listening on {addr}");
    info!("Endpoints: /webhook (Linear relay), /report (daily digest), /report/by-user, /health");

    axum::serve(listener, app).await?;

    Ok(())
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status, error = %self, "Request failed");
        } else {
            warn!(status = %status, error = %self, "Request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Service metadata.
async fn root() -> Json<Value> {
    Json(json!({
        "service": "Linear-Discord Communication Relay",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/webhook": "POST - Receive Linear webhooks and forward to Discord",
            "/report": "GET/POST - Generate and send daily digest",
            "/report/by-user": "GET/POST - Generate and send per-user task report",
            "/health": "GET - Health check"
        }
    }))
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Relay a Linear webhook to Discord.
pub async fn linear_webhook_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, RelayError> {
    debug!(body = %String::from_utf8_lossy(&body), "Received Linear webhook");

    let payload = WebhookPayload::from_slice(&body)?;
    info!(
        event_type = %payload.event_type,
        action = %payload.action,
        "Received Linear webhook"
    );

    let event = payload.into_event()?;
    if let WebhookEvent::Unrecognized { event_type } = &event {
        info!(event_type = %event_type, "Unhandled webhook type");
    }

    let Some(message) = render_event(&event, Utc::now()) else {
        return Ok(Json(json!({ "status": "ignored" })));
    };

    state.sink.deliver(&message).await?;

    Ok(Json(json!({ "status": "forwarded" })))
}

/// Generate and send the daily digest.
async fn report_handler(State(state): State<AppState>) -> Result<Json<Value>, RelayError> {
    let client = state.linear()?;
    report::send_daily_digest(client, state.sink.as_ref()).await?;
    Ok(Json(json!({ "status": "report_sent" })))
}

/// Generate and send the per-user task report.
async fn user_report_handler(State(state): State<AppState>) -> Result<Json<Value>, RelayError> {
    let client = state.linear()?;
    report::send_user_report(client, state.sink.as_ref(), state.config.batch_delay).await?;
    Ok(Json(json!({ "status": "user_report_sent" })))
}
