//! # Handler Registry
//!
//! Registration and lookup of webhook handlers by source name.
//!
//! Registration happens during the explicit startup sequence (see
//! [`crate::sources::register_sources`]), before the ingress server binds its
//! socket, so routing is stable for the lifetime of the process.

pub mod webhook_registry;

pub use webhook_registry::{HandlerEntry, WebhookHandler, WebhookRegistry};
