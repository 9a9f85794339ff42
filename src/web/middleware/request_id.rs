//! Request ID middleware.
//!
//! Tags every inbound request with a v4 UUID, exposed to handlers through
//! request extensions and echoed back in the `x-request-id` response header
//! for log correlation with upstream senders.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Identifier attached to each request for tracing.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Generate a request ID, stash it in extensions, and echo it in the response.
pub async fn add_request_id(mut request: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
