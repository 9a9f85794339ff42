//! # Ingress Middleware
//!
//! Middleware stack for the ingress server: request ID generation and
//! request/response tracing.
//!
//! Authentication is deliberately not middleware here. The shared-secret check
//! belongs to the webhook handler itself so its ordering relative to registry
//! lookup and payload decode stays explicit (secret check first, always).

pub mod request_id;

use axum::middleware;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::web::state::AppState;

/// Apply the middleware stack to the ingress router.
///
/// Order (outermost first): request ID generation, then HTTP tracing.
pub fn apply_middleware_stack(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(middleware::from_fn(request_id::add_request_id))
        .layer(TraceLayer::new_for_http())
}
