//! # Ingress Request Handlers
//!
//! HTTP request handlers for the ingress server: liveness probing and the
//! generic webhook route.

pub mod health;
pub mod webhooks;
