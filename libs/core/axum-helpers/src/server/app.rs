use axum::{Router, middleware};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::errors::handlers::{method_not_allowed, not_found};
use crate::middleware::{recovery_layer, request_context_middleware, request_logger};

/// Wraps a router with the error pipeline.
///
/// This function sets up:
/// - 404 and 405 fallbacks answering with the error envelope
/// - Panic recovery (500 envelope, panic text only in the log)
/// - Trace-level request logging and an HTTP trace span
/// - Request context (`x-request-id`, `Accept-Language`) around all of it
///
/// # Example
/// ```ignore
/// use axum::{Router, routing::get};
/// use axum_helpers::server::with_error_pipeline;
///
/// let app = with_error_pipeline(Router::new().route("/users", get(list_users)));
/// axum::serve(listener, app).await?;
/// ```
pub fn with_error_pipeline<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(recovery_layer())
        .layer(middleware::from_fn(request_logger))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(middleware::from_fn(request_context_middleware))
}
