//! # Ingress Application State
//!
//! Shared state for the ingress HTTP handlers: the handler registry and the
//! expected shared secret. Explicitly constructed and passed (no process-wide
//! singletons), so tests and deployments get isolated instances.

use crate::registry::WebhookRegistry;
use std::sync::Arc;

/// Shared application state for the ingress server.
///
/// Cloned per request by axum; both fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Handler registry, populated during startup before the server binds.
    pub registry: Arc<WebhookRegistry>,
    /// Expected value of the `X-Webhook-Secret` header. Never empty while the
    /// server is listening; an empty secret keeps the server stopped.
    pub webhook_secret: Arc<str>,
}

impl AppState {
    /// Create state from a populated registry and the configured secret.
    pub fn new(registry: Arc<WebhookRegistry>, webhook_secret: String) -> Self {
        Self {
            registry,
            webhook_secret: webhook_secret.into(),
        }
    }
}
