use std::any::Any;

use axum::response::{IntoResponse, Response};
use core_errors::recovery;
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::HttpError;

/// Panic handler used by [`recovery_layer`].
///
/// The panic is classified and logged once; the client gets the standard
/// 500 envelope (or the envelope of an `ErrorValue` passed to
/// `std::panic::panic_any`).
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    HttpError(recovery::error_from_panic(payload)).into_response()
}

/// Layer turning handler panics into error envelopes.
///
/// Must sit inside [`request_context_middleware`] for the envelope to carry
/// the caller's request id and locale.
///
/// [`request_context_middleware`]: super::request_context_middleware
pub fn recovery_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(handle_panic as fn(Box<dyn Any + Send + 'static>) -> Response)
}
