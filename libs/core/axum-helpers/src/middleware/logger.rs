use std::time::Instant;

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use core_errors::context;
use core_errors::logging::sanitize;
use serde_json::{Map, Value};

/// Target of the request logger events.
pub const LOG_TARGET: &str = "axum_helpers::request";

/// Request headers as JSON with credentials redacted.
pub fn redacted_headers(headers: &HeaderMap) -> Value {
    let map: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            let value = value.to_str().unwrap_or("<binary>");
            (name.as_str().to_string(), Value::String(value.to_string()))
        })
        .collect();
    sanitize(&Value::Object(map))
}

/// Trace-level request logger.
///
/// Emits `request started` and `request finished` with method, path, status
/// and latency. Runs inside [`request_context_middleware`] so both events
/// carry the request id.
///
/// [`request_context_middleware`]: super::request_context_middleware
pub async fn request_logger(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = context::current_request_id();

    if tracing::enabled!(target: LOG_TARGET, tracing::Level::TRACE) {
        let headers = redacted_headers(request.headers());
        tracing::trace!(
            target: LOG_TARGET,
            request_id = %request_id,
            method = %method,
            path = %path,
            headers = %headers,
            "request started"
        );
    }

    let started = Instant::now();
    let response = next.run(request).await;

    tracing::trace!(
        target: LOG_TARGET,
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request finished"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use core_errors::logging::REDACTED;
    use test_utils::LogCapture;
    use tower::ServiceExt;

    #[test]
    fn test_authorization_header_is_redacted() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc.def".parse().unwrap());
        headers.insert("content-type", "application/json".parse().unwrap());

        let redacted = redacted_headers(&headers);
        assert_eq!(redacted["authorization"], REDACTED);
        assert_eq!(redacted["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_logs_start_and_finish() {
        let capture = LogCapture::new();
        let _guard = capture.set_default();

        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(axum::middleware::from_fn(request_logger));
        let request = Request::builder()
            .uri("/ping")
            .header("authorization", "Bearer secret-token")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let events = capture.events_for_target(LOG_TARGET);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "request started");
        assert!(!events[0].field("headers").unwrap().contains("secret-token"));
        assert_eq!(events[1].message, "request finished");
        assert_eq!(events[1].field("status"), Some("200"));
        assert_eq!(events[1].field("path"), Some("/ping"));
    }
}
