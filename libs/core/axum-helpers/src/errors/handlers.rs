use axum::{
    http::{Method, Uri},
    response::{IntoResponse, Response},
};
use core_errors::factory;
use serde_json::json;

use super::HttpError;

/// Fallback for unmatched routes (404).
///
/// Use with `Router::fallback`.
pub async fn not_found(method: Method, uri: Uri) -> Response {
    let err = factory::resource_not_found(
        uri.path(),
        Some(json!({ "method": method.as_str(), "path": uri.path() })),
    );
    HttpError(err).into_response()
}

/// Fallback for a known route hit with the wrong method (405).
///
/// Use with `Router::method_not_allowed_fallback`.
pub async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    let err = factory::method_not_allowed(
        format!("{} {}", method, uri.path()),
        Some(json!({ "method": method.as_str(), "path": uri.path() })),
    );
    HttpError(err).into_response()
}
