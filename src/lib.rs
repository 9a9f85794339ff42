#![allow(clippy::doc_markdown)] // Allow technical terms like Telnyx, JSON in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Attache Ingress
//!
//! Webhook ingress and dispatch layer for the Attache personal-assistant backend.
//!
//! ## Overview
//!
//! Third-party services (an SMS gateway, transcript pipelines, anything wired up
//! through Zapier) push events to the assistant over plain HTTP. This crate owns
//! that ingress path: a small axum server that authenticates each push against a
//! shared secret, routes it by source name to a registered handler, and schedules
//! the handler as an independent task so the sender gets its `200` back before
//! any business logic runs. Webhook senders enforce short response budgets and
//! retry on timeout; decoupling acknowledgement from handler latency is what
//! keeps their retry policies from turning one slow downstream call into a
//! duplicate-delivery storm.
//!
//! ## Module Organization
//!
//! - [`config`] - Configuration loading and validation
//! - [`registry`] - Webhook handler registration and lookup
//! - [`web`] - HTTP server, routing, middleware, and error responses
//! - [`sources`] - Source-specific handlers (SMS admission filter, Plaud transcripts)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use attache_ingress::config::IngressConfig;
//! use attache_ingress::registry::WebhookRegistry;
//! use attache_ingress::web::{AppState, WebhookServer};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = IngressConfig::load()?;
//! let registry = Arc::new(WebhookRegistry::new());
//! // ... register sources before serving ...
//! let state = AppState::new(Arc::clone(&registry), config.webhook.secret.clone());
//! let mut server = WebhookServer::new(&config.webhook);
//! server.start(state).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod registry;
pub mod sources;
pub mod web;

pub use config::IngressConfig;
pub use registry::{WebhookHandler, WebhookRegistry};
pub use web::{AppState, ServerState, WebhookServer};
