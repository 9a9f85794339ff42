//! # Webhook Registry
//!
//! Central catalog of webhook handlers keyed by source name, with thread-safe
//! access.
//!
//! ## Overview
//!
//! The `WebhookRegistry` maps a source identifier (the `{source}` path segment
//! of `POST /webhooks/{source}`) to the handler that processes payloads from
//! that provider. Integration modules register their handlers during startup;
//! the ingress server resolves handlers per request. The table is read-mostly:
//! writes occur only during initialization, lookups for the rest of the
//! process lifetime.
//!
//! ## Usage
//!
//! ```rust
//! use attache_ingress::registry::{WebhookHandler, WebhookRegistry};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct TranscriptHandler;
//!
//! #[async_trait]
//! impl WebhookHandler for TranscriptHandler {
//!     async fn handle(&self, payload: serde_json::Value) -> anyhow::Result<()> {
//!         let _ = payload;
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() {
//! let registry = WebhookRegistry::new();
//! registry.register("plaud", Arc::new(TranscriptHandler)).await;
//! assert!(registry.resolve("plaud").await.is_some());
//! # }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// A webhook handler bound to a source name.
///
/// Handlers receive the decoded JSON payload of an authenticated push and may
/// perform arbitrary external calls. They must tolerate being invoked
/// concurrently with themselves and with other handlers; the ingress server
/// gives no ordering guarantee between dispatches, even for the same source.
///
/// A returned `Err` is logged at the dispatch boundary and discarded. It never
/// reaches the original sender, which has already received its `200`.
#[async_trait]
pub trait WebhookHandler: Send + Sync {
    /// Process one decoded webhook payload.
    async fn handle(&self, payload: Value) -> anyhow::Result<()>;
}

/// A registered handler plus registration-time diagnostics.
#[derive(Clone)]
pub struct HandlerEntry {
    pub handler: Arc<dyn WebhookHandler>,
    pub registered_at: DateTime<Utc>,
}

impl std::fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("handler", &"<Arc<dyn WebhookHandler>>".to_string())
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

/// Registry of webhook handlers keyed by source name.
pub struct WebhookRegistry {
    handlers: Arc<RwLock<HashMap<String, HandlerEntry>>>,
}

impl WebhookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Bind `handler` under `source`.
    ///
    /// Source names must be non-empty; an empty name is refused without error.
    /// Re-registering an existing source silently replaces the previous
    /// binding (last-write-wins).
    pub async fn register(&self, source: &str, handler: Arc<dyn WebhookHandler>) {
        if source.is_empty() {
            debug!("Ignoring webhook registration with empty source name");
            return;
        }

        let entry = HandlerEntry {
            handler,
            registered_at: Utc::now(),
        };

        let mut handlers = self.handlers.write().await;
        if let Some(previous) = handlers.insert(source.to_string(), entry) {
            info!(
                source = %source,
                previous_registration = %previous.registered_at,
                "Replaced webhook handler"
            );
        } else {
            info!(source = %source, "Registered webhook handler");
        }
    }

    /// Look up the handler bound to `source`. Pure lookup, no side effects.
    pub async fn resolve(&self, source: &str) -> Option<Arc<dyn WebhookHandler>> {
        let handlers = self.handlers.read().await;
        handlers.get(source).map(|entry| Arc::clone(&entry.handler))
    }

    /// When the handler for `source` was (last) registered. Diagnostic only.
    pub async fn registered_at(&self, source: &str) -> Option<DateTime<Utc>> {
        let handlers = self.handlers.read().await;
        handlers.get(source).map(|entry| entry.registered_at)
    }

    /// Snapshot of currently bound source names, sorted for stable diagnostics.
    pub async fn list_sources(&self) -> Vec<String> {
        let handlers = self.handlers.read().await;
        let mut sources: Vec<String> = handlers.keys().cloned().collect();
        sources.sort();
        sources
    }

    /// Number of bound sources.
    pub async fn len(&self) -> usize {
        self.handlers.read().await.len()
    }

    /// Whether no sources are bound.
    pub async fn is_empty(&self) -> bool {
        self.handlers.read().await.is_empty()
    }
}

impl Default for WebhookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
