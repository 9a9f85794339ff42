//! # Generic Webhook Ingress Handler
//!
//! Terminates `POST /webhooks/{source}`: authenticates the shared secret,
//! resolves the source in the registry, decodes the JSON payload, then
//! schedules the handler as an independent task and acknowledges immediately.
//!
//! The ordering is part of the contract. Authentication runs before the
//! registry lookup so unknown sources never leak through a different status
//! code to an unauthenticated caller, and the body is only parsed once both
//! checks pass. The `200` is issued without awaiting handler completion;
//! senders enforce short response budgets and retry on timeout, so handler
//! latency must never reach the acknowledgement path.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::registry::WebhookHandler;
use crate::web::errors::ApiError;
use crate::web::state::AppState;

/// Header carrying the shared secret on every generic-path request.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Acknowledgement body returned once a payload has been dispatched.
#[derive(Serialize)]
pub struct WebhookAck {
    ok: bool,
}

/// Generic webhook ingress: POST /webhooks/{source}
pub async fn ingest_webhook(
    State(state): State<AppState>,
    Path(source): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let presented = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    // Empty configured secret rejects everything; the server should not be
    // listening in that state at all, this is the backstop.
    if state.webhook_secret.is_empty() || presented != &*state.webhook_secret {
        warn!(source = %source, "Webhook rejected: invalid secret");
        return Err(ApiError::Unauthorized);
    }

    let handler = state.registry.resolve(&source).await.ok_or_else(|| {
        warn!(source = %source, "Webhook rejected: no handler for source");
        ApiError::unknown_source(&source)
    })?;

    let payload: Value = serde_json::from_slice(&body).map_err(|_| {
        warn!(source = %source, "Webhook rejected: invalid JSON body");
        ApiError::invalid_json(&source)
    })?;

    info!(
        source = %source,
        keys = ?payload_keys(&payload),
        "Webhook received"
    );

    // Fire-and-forget: acknowledge now, process in the background.
    tokio::spawn(run_handler(handler, source, payload));

    Ok(Json(WebhookAck { ok: true }))
}

/// Execute a dispatched handler inside its failure boundary.
///
/// Errors are logged with source context and discarded; they must never reach
/// the listener or other in-flight dispatches. Panics are contained by the
/// task boundary itself.
async fn run_handler(handler: Arc<dyn WebhookHandler>, source: String, payload: Value) {
    if let Err(error) = handler.handle(payload).await {
        error!(source = %source, error = %error, "Webhook handler failed");
    }
}

/// First few top-level keys of the payload, for diagnostic logging.
fn payload_keys(payload: &Value) -> Vec<&str> {
    match payload {
        Value::Object(map) => map.keys().take(10).map(String::as_str).collect(),
        _ => Vec::new(),
    }
}
