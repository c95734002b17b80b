pub mod handlers;

use axum::{
    Json,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use core_errors::context::{self, REQUEST_ID_HEADER, RequestContext};
use core_errors::envelope::{self, ErrorEnvelope};
use core_errors::{ErrorKind, ErrorValue};

/// HTTP wrapper around a classified [`ErrorValue`].
///
/// Handlers return `Result<_, HttpError>` and use `?` on anything that yields
/// an `ErrorValue`. The response body is the error envelope:
///
/// ```json
/// {
///   "meta": { "request_id": "4b7c…", "code": 404, "message": "Resource not found" },
///   "error": null
/// }
/// ```
///
/// The factory already logged the error, so converting it to a response does
/// not log again.
#[derive(Debug, Clone)]
pub struct HttpError(pub ErrorValue);

pub type HttpResult<T> = Result<T, HttpError>;

impl HttpError {
    pub fn kind(&self) -> ErrorKind {
        self.0.kind()
    }

    pub fn status(&self) -> StatusCode {
        self.0.http_status()
    }

    pub fn into_inner(self) -> ErrorValue {
        self.0
    }
}

impl From<ErrorValue> for HttpError {
    fn from(err: ErrorValue) -> Self {
        Self(err)
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for HttpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let ctx = context::current();
        let (status, body) = envelope::format_error(&ctx, &self.0);
        envelope_response(&ctx, status, body)
    }
}

/// Error response for any error, classified or not.
///
/// Errors that did not come from the factory become a 500 unknown error; their
/// text is logged and never sent to the client.
pub fn error_response(err: &(dyn std::error::Error + 'static)) -> Response {
    let ctx = context::current();
    let (status, body) = envelope::format_any_error(&ctx, err);
    envelope_response(&ctx, status, body)
}

pub(crate) fn envelope_response(
    ctx: &RequestContext,
    status: StatusCode,
    body: ErrorEnvelope,
) -> Response {
    let mut response = (status, Json(body)).into_response();
    set_request_id_header(&mut response, ctx);
    response
}

pub(crate) fn set_request_id_header(response: &mut Response, ctx: &RequestContext) {
    if let Ok(value) = HeaderValue::from_str(ctx.request_id()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
}
