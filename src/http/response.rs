//! Response helpers shared by the core routes.
//!
//! # Responsibilities
//! - Uniform 404 for unmatched paths
//! - Turn handler panics into 500 responses
//!
//! # Design Decisions
//! - Panic details reach the client only in debug mode
//! - Panics are always logged with their message

use std::any::Any;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::plugin::context::panic_message;

/// Fallback for paths no route matched.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Build the panic handler for `CatchPanicLayer`.
pub fn panic_responder(
    debug: bool,
) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response<Body> + Clone + Send + Sync + 'static {
    move |payload| {
        let message = panic_message(payload.as_ref());
        tracing::error!(panic = %message, "Handler panicked");

        let body = if debug {
            format!("Internal Server Error\n\n{message}")
        } else {
            "Internal Server Error".to_string()
        };

        Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Body::from(body))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
    }
}
