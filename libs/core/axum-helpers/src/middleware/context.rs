use axum::{extract::Request, middleware::Next, response::Response};
use core_errors::context;

use crate::errors::set_request_id_header;

/// Middleware that scopes the request context around the handler.
///
/// Reads `x-request-id` and `Accept-Language`, makes the context available
/// to the error factory and formatters, exposes it as a request extension
/// and echoes `x-request-id` on the response.
///
/// Install it outermost so the recovery layer and the fallbacks run inside
/// the scope:
///
/// ```ignore
/// let app = router
///     .layer(recovery_layer())
///     .layer(axum::middleware::from_fn(request_context_middleware));
/// ```
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    let ctx = context::from_headers(request.headers());
    request.extensions_mut().insert(ctx.clone());

    let scoped = ctx.clone();
    let mut response = context::scope(scoped, next.run(request)).await;
    set_request_id_header(&mut response, &ctx);
    response
}
